use crate::error::ProjectError;
use crate::xml::{seek_element, StartTag, XmlEvent, XmlStream};

/// One exposure station in a chunk.
///
/// The sensor link is resolved against the chunk's sensor map when the
/// camera is inserted; a camera whose sensor arrives later (or never) keeps
/// the raw id but stays unlinked. `image_index` is set when a frame image
/// resolves back to this camera and doubles as the aligned marker.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera id referenced by frame images.
    pub id: i64,
    /// Display label, usually the photo file name.
    pub label: String,
    /// Whether the camera is enabled in the chunk.
    pub enabled: bool,
    /// Raw `sensor_id` attribute; -1 when absent.
    pub sensor_id: i64,
    /// Key into the chunk's sensor map, once resolved.
    pub sensor_key: Option<i64>,
    /// Index into the chunk's image list, once an image resolves here.
    pub image_index: Option<usize>,
    /// Row-major 4x4 world transform; `None` until alignment places the
    /// camera.
    pub transform: Option<[f64; 16]>,
}

impl Camera {
    /// Parse a camera from the front of a document, skipping any wrapper
    /// tags. `Ok(None)` means the document holds a different entity type.
    pub fn from_stream(stream: &mut XmlStream) -> Result<Option<Self>, ProjectError> {
        match seek_element(stream, "camera")? {
            Some(tag) => Self::from_tag(&tag, stream).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a camera whose start tag was just consumed.
    pub(crate) fn from_tag(tag: &StartTag, stream: &mut XmlStream) -> Result<Self, ProjectError> {
        let mut camera = Self {
            id: tag.attr_i64("id", 0),
            label: tag.attr("label").unwrap_or_default().to_string(),
            enabled: tag.attr_bool("enabled"),
            sensor_id: tag.attr_i64("sensor_id", -1),
            sensor_key: None,
            image_index: None,
            transform: None,
        };

        loop {
            match stream.next_event()? {
                XmlEvent::Start(child) if child.name == "transform" => {
                    let text = stream.read_element_text("transform")?;
                    camera.transform = parse_transform(&text, stream);
                }
                XmlEvent::End(name) if name == "camera" => return Ok(camera),
                XmlEvent::Eof => {
                    return Err(stream.parse_error("document ended inside <camera>"))
                }
                _ => {}
            }
        }
    }

    /// True once a frame image has been matched to this camera.
    pub fn is_aligned(&self) -> bool {
        self.image_index.is_some()
    }
}

// A pose is exactly 16 row-major values; anything else is dropped.
fn parse_transform(text: &str, stream: &XmlStream) -> Option<[f64; 16]> {
    let values: Vec<f64> = text
        .split_whitespace()
        .map(|v| v.parse().unwrap_or(0.0))
        .collect();
    match <[f64; 16]>::try_from(values) {
        Ok(matrix) => Some(matrix),
        Err(values) => {
            log::warn!(
                "camera transform has {} values, expected 16 (in {})",
                values.len(),
                stream.source().display()
            );
            None
        }
    }
}
