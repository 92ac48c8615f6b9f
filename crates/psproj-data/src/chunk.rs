use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::camera::Camera;
use crate::engine::{
    explode_tag, read_element_array, unhandled_element, ElementDispatcher, FileStack,
};
use crate::error::ProjectError;
use crate::image::Image;
use crate::model::Model;
use crate::phases::{
    AlignmentLevel, AlignmentPhase, DenseCloudLevel, DenseCloudPhase, DepthFilter,
    ModelGenerationPhase, OptimizePhase, TextureGenerationPhase,
};
use crate::properties;
use crate::sensor::Sensor;
use crate::status;
use crate::xml::{StartTag, XmlEvent, XmlStream};

/// One reconstruction unit of a project: its capture hardware, photos,
/// processing parameters, and generated mesh.
///
/// Sensors and cameras are keyed by their document ids. Cross-entity links
/// are resolved when entities are inserted; a link whose target has not
/// arrived by then stays unresolved, the raw id is kept either way.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// Chunk id from the document.
    pub id: i64,
    /// Display label; empty when the document has none.
    pub label: String,
    /// Whether the chunk is enabled in the project.
    pub enabled: bool,
    /// Physical file the chunk body was read from.
    pub source_file: PathBuf,
    /// Physical file the first frame was read from, once seen.
    pub frame_file: Option<PathBuf>,
    /// Number of reference markers defined at chunk level.
    pub marker_count: u64,
    /// Number of scale bars.
    pub scalebar_count: u64,
    /// Sensors keyed by id.
    pub sensors: BTreeMap<i64, Sensor>,
    /// Cameras keyed by id.
    pub cameras: BTreeMap<i64, Camera>,
    /// Source photos recorded by the frame, in document order.
    pub images: Vec<Image>,
    /// Generated mesh, once the frame references one.
    pub model: Option<Model>,
    /// Image alignment parameters.
    pub alignment: AlignmentPhase,
    /// Camera optimization parameters.
    pub optimize: OptimizePhase,
    /// Dense cloud parameters.
    pub dense_cloud: DenseCloudPhase,
    /// Mesh generation parameters.
    pub model_generation: ModelGenerationPhase,
    /// Texture generation parameters.
    pub texture_generation: TextureGenerationPhase,
}

impl Chunk {
    /// Parse a chunk whose start tag was just consumed, following a `path`
    /// reference when one is present.
    pub(crate) fn from_tag(
        tag: &StartTag,
        stream: &mut XmlStream,
        stack: &mut FileStack,
    ) -> Result<Self, ProjectError> {
        let mut chunk = Self::default();
        chunk.read_attrs(tag);

        match explode_tag(tag, stack)? {
            Some(mut inner) => {
                chunk.source_file = stack.top().to_path_buf();
                let result = chunk.parse_body(&mut inner, stack);
                stack.pop();
                result?;
            }
            None => {
                chunk.source_file = stack.top().to_path_buf();
                chunk.parse_body(stream, stack)?;
            }
        }
        Ok(chunk)
    }

    // absent attributes never overwrite; the re-wrapping tag of an exploded
    // document may carry fewer attributes than the reference tag did
    fn read_attrs(&mut self, tag: &StartTag) {
        if tag.attr("id").is_some() {
            self.id = tag.attr_i64("id", 0);
        }
        if let Some(label) = tag.attr("label") {
            self.label = label.to_string();
        }
        if tag.attr("enabled").is_some() {
            self.enabled = tag.attr_bool("enabled");
        }
    }

    fn parse_body(
        &mut self,
        stream: &mut XmlStream,
        stack: &mut FileStack,
    ) -> Result<(), ProjectError> {
        loop {
            match stream.next_event()? {
                XmlEvent::Start(tag) => match tag.name.as_str() {
                    // an exploded document re-wraps the body in its own
                    // chunk tag carrying the attributes
                    "chunk" => self.read_attrs(&tag),
                    "sensors" => {
                        let mut elements = ChunkElements { chunk: &mut *self };
                        read_element_array(stream, stack, "sensors", "sensor", &mut elements)?;
                    }
                    "cameras" => {
                        let mut elements = ChunkElements { chunk: &mut *self };
                        read_element_array(stream, stack, "cameras", "camera", &mut elements)?;
                    }
                    "markers" => {
                        let mut elements = ChunkElements { chunk: &mut *self };
                        read_element_array(stream, stack, "markers", "marker", &mut elements)?;
                    }
                    "scalebars" => {
                        let mut elements = ChunkElements { chunk: &mut *self };
                        read_element_array(stream, stack, "scalebars", "scalebar", &mut elements)?;
                    }
                    "frames" => {
                        let mut elements = ChunkElements { chunk: &mut *self };
                        read_element_array(stream, stack, "frames", "frame", &mut elements)?;
                    }
                    "property" => {
                        properties::apply(
                            self,
                            tag.attr("name").unwrap_or_default(),
                            tag.attr("value").unwrap_or_default(),
                        );
                    }
                    _ => {}
                },
                XmlEvent::End(name) if name == "chunk" => return Ok(()),
                XmlEvent::Eof => return Ok(()),
                _ => {}
            }
        }
    }

    /// Parse one `frame` element, following its `path` reference when
    /// present. The first frame claims `frame_file`.
    fn parse_frame(
        &mut self,
        tag: &StartTag,
        stream: &mut XmlStream,
        stack: &mut FileStack,
    ) -> Result<(), ProjectError> {
        match explode_tag(tag, stack)? {
            Some(mut inner) => {
                self.frame_file = Some(stack.top().to_path_buf());
                let result = self.frame_body(&mut inner, stack);
                stack.pop();
                result
            }
            None => {
                self.frame_file = Some(stack.top().to_path_buf());
                self.frame_body(stream, stack)
            }
        }
    }

    fn frame_body(
        &mut self,
        stream: &mut XmlStream,
        stack: &mut FileStack,
    ) -> Result<(), ProjectError> {
        loop {
            match stream.next_event()? {
                XmlEvent::Start(tag) => match tag.name.as_str() {
                    "cameras" => {
                        let mut elements = FrameElements { chunk: &mut *self };
                        read_element_array(stream, stack, "cameras", "camera", &mut elements)?;
                    }
                    // frame markers are projections of the chunk markers,
                    // not additional ones
                    "markers" => stream.skip_element("markers")?,
                    "depth_maps" => {
                        let mut elements = FrameElements { chunk: &mut *self };
                        read_element_array(stream, stack, "depth_maps", "depth_map", &mut elements)?;
                    }
                    "model" => self.parse_model(&tag, stream, stack)?,
                    "property" => {
                        properties::apply(
                            self,
                            tag.attr("name").unwrap_or_default(),
                            tag.attr("value").unwrap_or_default(),
                        );
                    }
                    // thumbnails, point_cloud and dense_cloud containers are
                    // walked through so their property children land above
                    _ => {}
                },
                XmlEvent::End(name) if name == "frame" => return Ok(()),
                XmlEvent::Eof => return Ok(()),
                _ => {}
            }
        }
    }

    fn parse_model(
        &mut self,
        tag: &StartTag,
        stream: &mut XmlStream,
        stack: &mut FileStack,
    ) -> Result<(), ProjectError> {
        match explode_tag(tag, stack)? {
            Some(mut inner) => {
                let source = stack.top().to_path_buf();
                let result = Model::from_stream(&mut inner, &source, |name, value| {
                    properties::apply(self, name, value)
                });
                stack.pop();
                match result? {
                    Some(model) => self.model = Some(model),
                    None => log::warn!("model reference {} holds no model", source.display()),
                }
                Ok(())
            }
            None => {
                let source = stack.top().to_path_buf();
                let model = Model::from_tag(tag, stream, &source, |name, value| {
                    properties::apply(self, name, value)
                })?;
                self.model = Some(model);
                Ok(())
            }
        }
    }

    // Per-entity insertion. Links are resolved here and only here, so
    // insertion order decides what gets linked.

    pub(crate) fn add_sensor(&mut self, sensor: Sensor) {
        self.sensors.insert(sensor.id, sensor);
    }

    pub(crate) fn add_camera(&mut self, mut camera: Camera) {
        if self.sensors.contains_key(&camera.sensor_id) {
            camera.sensor_key = Some(camera.sensor_id);
        }
        self.cameras.insert(camera.id, camera);
    }

    pub(crate) fn add_image(&mut self, mut image: Image) {
        let index = self.images.len();
        if let Some(camera) = self.cameras.get_mut(&image.camera_id) {
            image.camera_key = Some(image.camera_id);
            camera.image_index = Some(index);
        }
        self.images.push(image);
    }

    /// Number of source photos recorded by the frame.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of cameras defined in the chunk.
    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Number of sensors defined in the chunk.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Whether a generated mesh is referenced.
    pub fn has_mesh(&self) -> bool {
        self.model.is_some()
    }

    /// Face count of the mesh; -1 when no mesh exists.
    pub fn model_face_count(&self) -> i64 {
        self.model.as_ref().map_or(-1, |m| m.face_count)
    }

    /// Vertex count of the mesh; -1 when no mesh exists.
    pub fn model_vertex_count(&self) -> i64 {
        self.model.as_ref().map_or(-1, |m| m.vertex_count)
    }

    /// Archive holding the mesh entries, when the model came from one.
    pub fn model_archive_file(&self) -> Option<&PathBuf> {
        self.model.as_ref().and_then(|m| m.archive_file.as_ref())
    }

    /// One-line alignment summary, e.g. `High (120 - 40k/4000k)`.
    pub fn describe_alignment_phase(&self) -> String {
        if self.alignment.level == AlignmentLevel::Unknown {
            return "N/A".to_string();
        }
        format!(
            "{} ({} - {}k/{}k)",
            self.alignment.level.label(),
            self.images.len(),
            self.alignment.feature_limit / 1000,
            self.alignment.tie_point_limit / 1000
        )
    }

    /// Alignment phase score, 0 best to 5 never ran.
    pub fn alignment_phase_status(&self) -> u8 {
        if self.alignment.level == AlignmentLevel::Unknown {
            return 5;
        }
        status::alignment_status(self.images.len(), self.cameras.len())
    }

    /// One-line dense cloud summary, e.g. `Ultra (32)`.
    pub fn describe_dense_cloud_phase(&self) -> String {
        if self.dense_cloud.level == DenseCloudLevel::Unknown {
            return "N/A".to_string();
        }
        format!(
            "{} ({})",
            self.dense_cloud.level.label(),
            self.dense_cloud.images_used
        )
    }

    /// Dense cloud phase score, 0 best to 5 never ran.
    pub fn dense_cloud_phase_status(&self) -> u8 {
        status::dense_cloud_status(
            self.dense_cloud.images_used,
            self.cameras.len(),
            self.dense_cloud.level != DenseCloudLevel::Unknown,
        )
    }

    /// One-line mesh summary, e.g. `1.2M faces`. A mesh whose face count
    /// never surfaced reads `?`.
    pub fn describe_model_gen_phase(&self) -> String {
        let faces = self.model_face_count();
        if faces < 0 {
            return if self.has_mesh() { "?" } else { "N/A" }.to_string();
        }
        let thousands = faces as f64 / 1000.0;
        if thousands >= 1000.0 {
            format!("{:.1}M faces", thousands / 1000.0)
        } else {
            format!("{thousands:.1}K faces")
        }
    }

    /// Mesh generation phase score, 0 best to 5 never ran.
    pub fn model_gen_phase_status(&self) -> u8 {
        status::model_status(self.model_face_count())
    }

    /// One-line texture summary, e.g. `1 @ (4096 x 4096)`.
    pub fn describe_texture_gen_phase(&self) -> String {
        let tex = &self.texture_generation;
        if tex.count != 0 {
            format!("{} @ ({} x {})", tex.count, tex.width, tex.height)
        } else {
            "N/A".to_string()
        }
    }

    /// Texture generation phase score, 0 best to 5 never ran.
    pub fn texture_gen_phase_status(&self) -> u8 {
        status::texture_status(self.texture_generation.width, self.texture_generation.height)
    }

    /// Multi-line, human-readable summary of the chunk and its phases.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let label = if self.label.is_empty() {
            "[none]"
        } else {
            &self.label
        };
        let _ = writeln!(out, "\tChunk ID: {}, Label: {}", self.id, label);
        let _ = writeln!(
            out,
            "\t{} image(s), {} sensor(s), {} depth map(s)",
            self.images.len(),
            self.sensors.len(),
            self.dense_cloud.images_used
        );
        if !self.enabled {
            out.push_str("\tDISABLED\n");
        }

        if self.alignment.level == AlignmentLevel::Unknown {
            out.push_str("\n\tImage Align - no data\n");
        } else {
            out.push_str("\n\tImage Align\n");
            let masked = if self.alignment.masked { ", MASKED" } else { "" };
            let _ = writeln!(
                out,
                "\t              {}{masked}",
                self.alignment.level.description()
            );
            let _ = writeln!(
                out,
                "\t              {} key point limit",
                self.alignment.feature_limit
            );
            let _ = writeln!(
                out,
                "\t              {} tie point limit",
                self.alignment.tie_point_limit
            );
        }

        out.push_str("\n\tOptimization -");
        for group in self.optimize.enabled_labels().chunks(4) {
            let _ = write!(out, "\n\t               {}", group.join(", "));
        }
        out.push('\n');

        if self.dense_cloud.filter == DepthFilter::Unknown {
            out.push_str("\n\tDense Cloud - no data\n");
        } else {
            out.push_str("\n\tDense Cloud\n");
            let _ = writeln!(
                out,
                "\t              {}, {}",
                self.dense_cloud.level.description(),
                self.dense_cloud.filter.description()
            );
        }

        match &self.model {
            None => out.push_str("\n\tModel Generation - no data\n"),
            Some(model) => {
                out.push_str("\n\tModel Generation\n");
                let _ = writeln!(out, "\t                   {} faces", model.face_count);
            }
        }

        out
    }
}

/// Dispatcher for arrays directly below a chunk.
struct ChunkElements<'a> {
    chunk: &'a mut Chunk,
}

impl ElementDispatcher for ChunkElements<'_> {
    fn on_element(
        &mut self,
        stream: &mut XmlStream,
        stack: &mut FileStack,
        tag: &StartTag,
    ) -> Result<(), ProjectError> {
        match tag.name.as_str() {
            "sensor" => {
                let sensor = Sensor::from_tag(tag, stream)?;
                self.chunk.add_sensor(sensor);
                Ok(())
            }
            "camera" => {
                let camera = Camera::from_tag(tag, stream)?;
                self.chunk.add_camera(camera);
                Ok(())
            }
            "marker" => {
                stream.skip_element("marker")?;
                self.chunk.marker_count += 1;
                Ok(())
            }
            "scalebar" => {
                stream.skip_element("scalebar")?;
                self.chunk.scalebar_count += 1;
                Ok(())
            }
            "frame" => self.chunk.parse_frame(tag, stream, stack),
            name => {
                unhandled_element(name);
                stream.skip_element(name)
            }
        }
    }

    fn on_property(&mut self, name: &str, value: &str) {
        properties::apply(self.chunk, name, value);
    }
}

/// Dispatcher for arrays below a frame, where `camera` elements are source
/// photos and `depth_map` elements only count.
struct FrameElements<'a> {
    chunk: &'a mut Chunk,
}

impl ElementDispatcher for FrameElements<'_> {
    fn on_element(
        &mut self,
        stream: &mut XmlStream,
        _stack: &mut FileStack,
        tag: &StartTag,
    ) -> Result<(), ProjectError> {
        match tag.name.as_str() {
            "camera" => {
                let image = Image::from_tag(tag, stream)?;
                self.chunk.add_image(image);
                Ok(())
            }
            "depth_map" => {
                stream.skip_element("depth_map")?;
                self.chunk.dense_cloud.images_used += 1;
                Ok(())
            }
            name => {
                unhandled_element(name);
                stream.skip_element(name)
            }
        }
    }

    fn on_property(&mut self, name: &str, value: &str) {
        properties::apply(self.chunk, name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_chunk(xml: &str) -> Chunk {
        let mut stream = XmlStream::from_bytes(xml.as_bytes().to_vec(), "/proj/test.psx");
        let mut stack = FileStack::new("/proj/test.psx");
        let tag = match stream.next_event().unwrap() {
            XmlEvent::Start(tag) => tag,
            other => panic!("expected chunk start, got {other:?}"),
        };
        Chunk::from_tag(&tag, &mut stream, &mut stack).unwrap()
    }

    const FULL_CHUNK: &str = r#"
      <chunk id="3" label="North wall" enabled="true">
        <sensors>
          <sensor id="0" label="D850"><resolution width="8256" height="5504"/></sensor>
        </sensors>
        <cameras>
          <camera id="0" sensor_id="0" label="IMG_0.JPG" enabled="true">
            <transform>1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1</transform>
          </camera>
          <camera id="1" sensor_id="0" label="IMG_1.JPG" enabled="true"/>
          <camera id="2" sensor_id="9" label="IMG_2.JPG" enabled="true"/>
        </cameras>
        <markers><marker id="0"/><marker id="1"/></markers>
        <scalebars><scalebar id="0"/></scalebars>
        <frames>
          <frame id="0">
            <cameras>
              <camera camera_id="0"><photo path="img0.jpg"/></camera>
              <camera camera_id="1"><photo path="img1.jpg"/></camera>
            </cameras>
            <markers><marker marker_id="0"/></markers>
            <depth_maps>
              <property name="dense_cloud/depth_downscale" value="2"/>
              <depth_map camera_id="0"/>
              <depth_map camera_id="1"/>
            </depth_maps>
            <model>
              <mesh path="model0/mesh.ply"/>
              <faceCount>150000</faceCount>
              <vertexCount>75000</vertexCount>
              <property name="atlas/atlas_count" value="1"/>
            </model>
            <property name="atlas/atlas_width" value="4096"/>
            <property name="atlas/atlas_height" value="4096"/>
          </frame>
        </frames>
        <property name="match/match_downscale" value="1"/>
        <property name="match/match_point_limit" value="40000"/>
        <property name="match/match_tiepoint_limit" value="4000000"/>
        <property name="dense_cloud/depth_filter_mode" value="2"/>
      </chunk>"#;

    #[test]
    fn entities_and_links_resolve_at_insertion() {
        let chunk = parse_chunk(FULL_CHUNK);
        assert_eq!(chunk.id, 3);
        assert_eq!(chunk.label, "North wall");
        assert!(chunk.enabled);
        assert_eq!(chunk.sensor_count(), 1);
        assert_eq!(chunk.camera_count(), 3);
        assert_eq!(chunk.image_count(), 2);

        // camera 2 references a sensor that never arrived
        assert_eq!(chunk.cameras[&0].sensor_key, Some(0));
        assert_eq!(chunk.cameras[&2].sensor_key, None);
        assert_eq!(chunk.cameras[&2].sensor_id, 9);

        // both frame images resolved back to their cameras
        assert!(chunk.cameras[&0].is_aligned());
        assert!(chunk.cameras[&1].is_aligned());
        assert!(!chunk.cameras[&2].is_aligned());
        assert_eq!(chunk.images[0].camera_key, Some(0));
    }

    #[test]
    fn chunk_markers_count_and_frame_markers_do_not() {
        let chunk = parse_chunk(FULL_CHUNK);
        assert_eq!(chunk.marker_count, 2);
        assert_eq!(chunk.scalebar_count, 1);
    }

    #[test]
    fn properties_reach_the_chunk_from_every_depth() {
        let chunk = parse_chunk(FULL_CHUNK);
        // chunk level
        assert_eq!(chunk.alignment.level, AlignmentLevel::High);
        assert_eq!(chunk.alignment.feature_limit, 40000);
        // loose property inside the depth_maps array
        assert_eq!(chunk.dense_cloud.level, DenseCloudLevel::High);
        // forwarded from the model element
        assert_eq!(chunk.texture_generation.count, 1);
        // frame level
        assert_eq!(chunk.texture_generation.width, 4096);
    }

    #[test]
    fn depth_maps_are_counted() {
        let chunk = parse_chunk(FULL_CHUNK);
        assert_eq!(chunk.dense_cloud.images_used, 2);
    }

    #[test]
    fn model_is_attached_with_counts() {
        let chunk = parse_chunk(FULL_CHUNK);
        assert!(chunk.has_mesh());
        assert_eq!(chunk.model_face_count(), 150000);
        assert_eq!(chunk.model_vertex_count(), 75000);
        // inline model, no archive involved
        assert!(chunk.model_archive_file().is_none());
    }

    #[test]
    fn phase_describe_strings() {
        let chunk = parse_chunk(FULL_CHUNK);
        assert_eq!(chunk.describe_alignment_phase(), "High (2 - 40k/4000k)");
        assert_eq!(chunk.describe_dense_cloud_phase(), "High (2)");
        assert_eq!(chunk.describe_model_gen_phase(), "150.0K faces");
        assert_eq!(chunk.describe_texture_gen_phase(), "1 @ (4096 x 4096)");
    }

    #[test]
    fn phase_statuses_for_a_processed_chunk() {
        let chunk = parse_chunk(FULL_CHUNK);
        // 2 of 3 cameras aligned
        assert_eq!(chunk.alignment_phase_status(), 2);
        assert_eq!(chunk.dense_cloud_phase_status(), 2);
        assert_eq!(chunk.model_gen_phase_status(), 1);
        assert_eq!(chunk.texture_gen_phase_status(), 0);
    }

    #[test]
    fn empty_chunk_degrades_to_defaults() {
        let chunk = parse_chunk(r#"<chunk id="0"/>"#);
        assert_eq!(chunk.describe_alignment_phase(), "N/A");
        assert_eq!(chunk.alignment_phase_status(), 5);
        assert_eq!(chunk.describe_dense_cloud_phase(), "N/A");
        assert_eq!(chunk.dense_cloud_phase_status(), 5);
        assert_eq!(chunk.describe_model_gen_phase(), "N/A");
        assert_eq!(chunk.model_gen_phase_status(), 5);
        assert_eq!(chunk.describe_texture_gen_phase(), "N/A");
        assert_eq!(chunk.texture_gen_phase_status(), 5);
    }

    #[test]
    fn mesh_without_face_count_reads_question_mark() {
        let chunk = parse_chunk(
            r#"<chunk id="0"><frames><frame id="0">
                 <model><mesh path="m.ply"/></model>
               </frame></frames></chunk>"#,
        );
        assert!(chunk.has_mesh());
        assert_eq!(chunk.model_face_count(), -1);
        assert_eq!(chunk.describe_model_gen_phase(), "?");
        assert_eq!(chunk.model_gen_phase_status(), 5);
    }

    #[test]
    fn unreadable_frame_reference_is_skipped_not_fatal() {
        let chunk = parse_chunk(
            r#"<chunk id="1" label="partial">
                 <sensors><sensor id="0"/></sensors>
                 <frames><frame id="0" path="gone.files/frame.zip"/></frames>
               </chunk>"#,
        );
        // the frame could not be opened but the rest of the chunk survives
        assert_eq!(chunk.sensor_count(), 1);
        assert_eq!(chunk.image_count(), 0);
        assert_eq!(chunk.label, "partial");
    }

    #[test]
    fn exploded_rewrap_tag_keeps_outer_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj.psx");
        let frag = dir.path().join("proj.files").join("chunk0.xml");
        std::fs::create_dir_all(frag.parent().unwrap()).unwrap();
        std::fs::write(
            &frag,
            r#"<document><chunk><sensors><sensor id="0"/></sensors></chunk></document>"#,
        )
        .unwrap();

        let mut stream = XmlStream::from_bytes(
            br#"<chunk id="7" label="kept" enabled="true" path="{projectname}.files/chunk0.xml"/>"#
                .to_vec(),
            &root,
        );
        let mut stack = FileStack::new(&root);
        let tag = match stream.next_event().unwrap() {
            XmlEvent::Start(tag) => tag,
            other => panic!("expected chunk start, got {other:?}"),
        };
        let chunk = Chunk::from_tag(&tag, &mut stream, &mut stack).unwrap();

        // the fragment's bare <chunk> must not reset what the reference carried
        assert_eq!(chunk.id, 7);
        assert_eq!(chunk.label, "kept");
        assert!(chunk.enabled);
        assert_eq!(chunk.sensor_count(), 1);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn million_face_mesh_reports_in_millions() {
        let mut chunk = parse_chunk(r#"<chunk id="0"/>"#);
        chunk.model = Some(
            crate::model::Model::from_stream(
                &mut XmlStream::from_bytes(
                    b"<model><faceCount>1200000</faceCount></model>".to_vec(),
                    "m.xml",
                ),
                std::path::Path::new("m.xml"),
                |_, _| {},
            )
            .unwrap()
            .unwrap(),
        );
        assert_eq!(chunk.describe_model_gen_phase(), "1.2M faces");
        assert_eq!(chunk.model_gen_phase_status(), 0);
    }

    #[test]
    fn report_covers_all_phases() {
        let chunk = parse_chunk(FULL_CHUNK);
        let report = chunk.report();
        assert!(report.contains("Chunk ID: 3, Label: North wall"));
        assert!(report.contains("2 image(s), 1 sensor(s), 2 depth map(s)"));
        assert!(report.contains("High Detail"));
        assert!(report.contains("40000 key point limit"));
        assert!(report.contains("Aggressive Filter"));
        assert!(report.contains("150000 faces"));
        assert!(!report.contains("DISABLED"));
    }
}
