use std::path::{Path, PathBuf};

use crate::chunk::Chunk;
use crate::engine::{
    explode_tag, read_element_array, unhandled_element, ElementDispatcher, FileStack,
};
use crate::error::ProjectError;
use crate::stream::open_project_stream;
use crate::xml::{StartTag, XmlEvent, XmlStream};

/// A parsed project: the format version and the chunks it defines.
///
/// One chunk is the active one and backs all the convenience accessors;
/// with no explicit selection the last chunk in document order is active,
/// which is where the desktop application appends new work.
#[derive(Debug, Clone)]
pub struct Project {
    /// Format version string from the document element.
    pub version: String,
    /// The root file the project was parsed from.
    pub source_file: PathBuf,
    /// Chunks in document order.
    pub chunks: Vec<Chunk>,
    /// Index of the active chunk; `None` for an empty project.
    pub active: Option<usize>,
}

impl Project {
    /// Parse a project from its root file, following every fragment
    /// reference. Only a failure to read the root document is fatal;
    /// individual chunks that fail to parse are logged and dropped.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let mut stack = FileStack::new(path);
        let mut stream = open_project_stream(path)?;

        let mut project = Self {
            version: String::new(),
            source_file: path.to_path_buf(),
            chunks: Vec::new(),
            active: None,
        };

        loop {
            match stream.next_event()? {
                XmlEvent::Start(tag) => match tag.name.as_str() {
                    "document" => {
                        if let Some(version) = tag.attr("version") {
                            project.version = version.to_string();
                        }
                        // the root document may be a stub pointing at the
                        // real one; switch over for good when it is
                        if let Some(inner) = explode_tag(&tag, &mut stack)? {
                            stream = inner;
                        }
                    }
                    "chunks" => {
                        let mut elements = ProjectElements {
                            chunks: &mut project.chunks,
                        };
                        read_element_array(&mut stream, &mut stack, "chunks", "chunk", &mut elements)?;
                    }
                    _ => {}
                },
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        project.active = project.chunks.len().checked_sub(1);
        Ok(project)
    }

    /// Number of chunks in the project.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// A chunk by index.
    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// The active chunk, if the project has any chunks.
    pub fn active_chunk(&self) -> Option<&Chunk> {
        self.active.and_then(|i| self.chunks.get(i))
    }

    /// Select the active chunk. Returns false and leaves the selection
    /// unchanged when the index is out of range.
    pub fn set_active_chunk(&mut self, index: usize) -> bool {
        if index < self.chunks.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Alignment summary of the active chunk; `N/A` without one.
    pub fn describe_alignment_phase(&self) -> String {
        self.active_chunk()
            .map_or_else(|| "N/A".to_string(), Chunk::describe_alignment_phase)
    }

    /// Alignment score of the active chunk; 0 without one.
    pub fn alignment_phase_status(&self) -> u8 {
        self.active_chunk().map_or(0, Chunk::alignment_phase_status)
    }

    /// Dense cloud summary of the active chunk; `N/A` without one.
    pub fn describe_dense_cloud_phase(&self) -> String {
        self.active_chunk()
            .map_or_else(|| "N/A".to_string(), Chunk::describe_dense_cloud_phase)
    }

    /// Depth map count of the active chunk; 0 without one.
    pub fn dense_cloud_depth_images(&self) -> i64 {
        self.active_chunk().map_or(0, |c| c.dense_cloud.images_used)
    }

    /// Dense cloud score of the active chunk; 0 without one.
    pub fn dense_cloud_phase_status(&self) -> u8 {
        self.active_chunk()
            .map_or(0, Chunk::dense_cloud_phase_status)
    }

    /// Mesh summary of the active chunk; `N/A` without one.
    pub fn describe_model_gen_phase(&self) -> String {
        self.active_chunk()
            .map_or_else(|| "N/A".to_string(), Chunk::describe_model_gen_phase)
    }

    /// Mesh score of the active chunk; 0 without one.
    pub fn model_gen_phase_status(&self) -> u8 {
        self.active_chunk().map_or(0, Chunk::model_gen_phase_status)
    }

    /// Mesh face count of the active chunk; 0 without one.
    pub fn model_face_count(&self) -> i64 {
        self.active_chunk().map_or(0, Chunk::model_face_count)
    }

    /// Mesh vertex count of the active chunk; 0 without one.
    pub fn model_vertex_count(&self) -> i64 {
        self.active_chunk().map_or(0, Chunk::model_vertex_count)
    }

    /// Archive holding the active chunk's mesh, when there is one.
    pub fn model_archive_file(&self) -> Option<&PathBuf> {
        self.active_chunk().and_then(Chunk::model_archive_file)
    }

    /// Texture summary of the active chunk; `N/A` without one.
    pub fn describe_texture_gen_phase(&self) -> String {
        self.active_chunk()
            .map_or_else(|| "N/A".to_string(), Chunk::describe_texture_gen_phase)
    }

    /// Texture score of the active chunk; 0 without one.
    pub fn texture_gen_phase_status(&self) -> u8 {
        self.active_chunk()
            .map_or(0, Chunk::texture_gen_phase_status)
    }
}

/// Dispatcher for the project-level chunk array.
struct ProjectElements<'a> {
    chunks: &'a mut Vec<Chunk>,
}

impl ElementDispatcher for ProjectElements<'_> {
    fn on_element(
        &mut self,
        stream: &mut XmlStream,
        stack: &mut FileStack,
        tag: &StartTag,
    ) -> Result<(), ProjectError> {
        match tag.name.as_str() {
            "chunk" => {
                let chunk = Chunk::from_tag(tag, stream, stack)?;
                self.chunks.push(chunk);
                Ok(())
            }
            name => {
                unhandled_element(name);
                stream.skip_element(name)
            }
        }
    }
}
