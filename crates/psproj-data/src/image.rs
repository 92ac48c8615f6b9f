use std::collections::HashMap;

use crate::error::ProjectError;
use crate::xml::{seek_element, StartTag, XmlEvent, XmlStream};

/// A source photograph recorded inside a frame.
///
/// Frames reuse the `camera` element name for these; the `camera_id`
/// attribute links back to the chunk camera and is missing in some older
/// documents, in which case it stays -1.
#[derive(Debug, Clone)]
pub struct Image {
    /// Raw `camera_id` attribute; -1 when absent.
    pub camera_id: i64,
    /// Key into the chunk's camera map, once resolved.
    pub camera_key: Option<i64>,
    /// Path of the photo file, from the `photo` child.
    pub file_path: String,
    /// Open key/value metadata bag.
    pub properties: HashMap<String, String>,
}

impl Image {
    /// Parse an image from the front of a document, skipping any wrapper
    /// tags. `Ok(None)` means the document holds a different entity type.
    pub fn from_stream(stream: &mut XmlStream) -> Result<Option<Self>, ProjectError> {
        match seek_element(stream, "camera")? {
            Some(tag) => Self::from_tag(&tag, stream).map(Some),
            None => Ok(None),
        }
    }

    /// Parse an image whose start tag was just consumed.
    pub(crate) fn from_tag(tag: &StartTag, stream: &mut XmlStream) -> Result<Self, ProjectError> {
        let mut image = Self {
            camera_id: tag.attr_i64("camera_id", -1),
            camera_key: None,
            file_path: String::new(),
            properties: HashMap::new(),
        };

        loop {
            match stream.next_event()? {
                XmlEvent::Start(child) => match child.name.as_str() {
                    "photo" => {
                        image.file_path = child.attr("path").unwrap_or_default().to_string();
                    }
                    "property" => {
                        image.properties.insert(
                            child.attr("name").unwrap_or_default().to_string(),
                            child.attr("value").unwrap_or_default().to_string(),
                        );
                    }
                    _ => {}
                },
                XmlEvent::End(name) if name == "camera" => return Ok(image),
                XmlEvent::Eof => {
                    return Err(stream.parse_error("document ended inside frame <camera>"))
                }
                _ => {}
            }
        }
    }

    /// Look up a metadata property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
