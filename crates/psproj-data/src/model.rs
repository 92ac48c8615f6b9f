use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::xml::{seek_element, StartTag, XmlEvent, XmlStream};

/// The generated mesh and its texture atlases, as referenced by a frame.
///
/// The model payload itself stays inside its archive; this records where the
/// entries live plus the summary statistics the document carries.
#[derive(Debug, Clone)]
pub struct Model {
    /// Archive the model entries live in, when it was read from one.
    pub archive_file: Option<PathBuf>,
    /// Path of the mesh entry, from the `mesh` child.
    pub mesh_path: String,
    /// Texture entry paths keyed by atlas id.
    pub textures: BTreeMap<i64, String>,
    /// Number of mesh faces; -1 until known.
    pub face_count: i64,
    /// Number of mesh vertices; -1 until known.
    pub vertex_count: i64,
    /// Whether the mesh carries per-vertex colors.
    pub has_vertex_colors: bool,
    /// Whether the mesh carries UV coordinates.
    pub has_uv: bool,
}

impl Model {
    fn new(source: &Path) -> Self {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let archive_file = match ext.as_str() {
            "zip" | "psz" => Some(source.to_path_buf()),
            _ => None,
        };
        Self {
            archive_file,
            mesh_path: String::new(),
            textures: BTreeMap::new(),
            face_count: -1,
            vertex_count: -1,
            has_vertex_colors: false,
            has_uv: false,
        }
    }

    /// Parse a model from the front of a document, skipping any wrapper
    /// tags. `Ok(None)` means the document holds a different entity type.
    /// `source` is the physical file the document came from; metadata
    /// properties are forwarded to `forward` for chunk-level ingestion.
    pub fn from_stream(
        stream: &mut XmlStream,
        source: &Path,
        forward: impl FnMut(&str, &str),
    ) -> Result<Option<Self>, ProjectError> {
        match seek_element(stream, "model")? {
            Some(tag) => Self::from_tag(&tag, stream, source, forward).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a model whose start tag was just consumed.
    pub(crate) fn from_tag(
        _tag: &StartTag,
        stream: &mut XmlStream,
        source: &Path,
        mut forward: impl FnMut(&str, &str),
    ) -> Result<Self, ProjectError> {
        let mut model = Self::new(source);

        loop {
            match stream.next_event()? {
                XmlEvent::Start(child) => match child.name.as_str() {
                    "mesh" => {
                        model.mesh_path = child.attr("path").unwrap_or_default().to_string();
                    }
                    "texture" => {
                        // single-texture models often omit the id
                        let id = child.attr_i64("id", 0);
                        let path = child.attr("path").unwrap_or_default().to_string();
                        model.add_texture(id, path);
                    }
                    "hasVertexColors" => {
                        model.has_vertex_colors =
                            stream.read_element_text("hasVertexColors")? == "true";
                    }
                    "hasUV" => {
                        model.has_uv = stream.read_element_text("hasUV")? == "true";
                    }
                    "faceCount" => {
                        model.face_count = stream
                            .read_element_text("faceCount")?
                            .trim()
                            .parse()
                            .unwrap_or(0);
                    }
                    "vertexCount" => {
                        model.vertex_count = stream
                            .read_element_text("vertexCount")?
                            .trim()
                            .parse()
                            .unwrap_or(0);
                    }
                    "property" => {
                        let name = child.attr("name").unwrap_or_default();
                        let value = child.attr("value").unwrap_or_default();
                        // older writers only record the face count here
                        if name.contains("face_count") && model.face_count <= 0 {
                            model.face_count = value.trim().parse().unwrap_or(0);
                        }
                        forward(name, value);
                    }
                    _ => {}
                },
                XmlEvent::End(name) if name == "model" => return Ok(model),
                XmlEvent::End(_) => {}
                XmlEvent::Eof => {
                    return Err(stream.parse_error("document ended inside <model>"))
                }
                XmlEvent::Text(_) => {}
            }
        }
    }

    fn add_texture(&mut self, id: i64, path: String) {
        if self.textures.contains_key(&id) {
            log::warn!("texture id collision, {id} already recorded");
        }
        self.textures.insert(id, path);
    }

    /// Texture entry path for an atlas id.
    pub fn texture(&self, id: i64) -> Option<&str> {
        self.textures.get(&id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(xml: &str) -> XmlStream {
        XmlStream::from_bytes(xml.as_bytes().to_vec(), "test.xml")
    }

    #[test]
    fn mesh_and_textures_are_recorded() {
        let mut s = stream(
            r#"<document><model>
                 <mesh path="model0/mesh.ply"/>
                 <texture id="1" path="model0/tex1.jpg"/>
                 <texture path="model0/tex0.jpg"/>
                 <faceCount>150000</faceCount>
                 <vertexCount>75123</vertexCount>
                 <hasVertexColors>true</hasVertexColors>
                 <hasUV>false</hasUV>
               </model></document>"#,
        );
        let model = Model::from_stream(&mut s, Path::new("/p/proj.files/model.zip"), |_, _| {})
            .unwrap()
            .unwrap();
        assert_eq!(
            model.archive_file.as_deref(),
            Some(Path::new("/p/proj.files/model.zip"))
        );
        assert_eq!(model.mesh_path, "model0/mesh.ply");
        assert_eq!(model.texture(1), Some("model0/tex1.jpg"));
        assert_eq!(model.texture(0), Some("model0/tex0.jpg"));
        assert_eq!(model.face_count, 150000);
        assert_eq!(model.vertex_count, 75123);
        assert!(model.has_vertex_colors);
        assert!(!model.has_uv);
    }

    #[test]
    fn unknown_children_and_their_end_tags_are_tolerated() {
        let mut s = stream(
            r#"<model>
                 <mesh path="m.ply"/>
                 <meta><generator>metashape</generator></meta>
                 <faceCount>42</faceCount>
               </model>"#,
        );
        let model = Model::from_stream(&mut s, Path::new("/p/m.zip"), |_, _| {})
            .unwrap()
            .unwrap();
        assert_eq!(model.mesh_path, "m.ply");
        assert_eq!(model.face_count, 42);
    }

    #[test]
    fn plain_file_source_leaves_archive_unset() {
        let mut s = stream("<model/>");
        let model = Model::from_stream(&mut s, Path::new("/p/doc.xml"), |_, _| {})
            .unwrap()
            .unwrap();
        assert!(model.archive_file.is_none());
        assert_eq!(model.face_count, -1);
    }

    #[test]
    fn legacy_face_count_property_backfills_and_forwards() {
        let mut s = stream(
            r#"<model>
                 <property name="model/mesh_face_count" value="4200"/>
                 <property name="model/resolution" value="0.01"/>
               </model>"#,
        );
        let mut forwarded = Vec::new();
        let model = Model::from_stream(&mut s, Path::new("/p/m.zip"), |name, value| {
            forwarded.push((name.to_string(), value.to_string()));
        })
        .unwrap()
        .unwrap();
        assert_eq!(model.face_count, 4200);
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0].0, "model/mesh_face_count");
    }

    #[test]
    fn explicit_face_count_wins_over_property() {
        let mut s = stream(
            r#"<model>
                 <faceCount>9000</faceCount>
                 <property name="model/mesh_face_count" value="4200"/>
               </model>"#,
        );
        let model = Model::from_stream(&mut s, Path::new("/p/m.psz"), |_, _| {})
            .unwrap()
            .unwrap();
        assert_eq!(model.face_count, 9000);
    }
}
