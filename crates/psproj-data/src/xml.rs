use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ProjectError;

/// A start tag with its decoded attributes.
#[derive(Debug, Clone)]
pub struct StartTag {
    /// Local element name.
    pub name: String,
    attrs: HashMap<String, String>,
}

impl StartTag {
    fn from_bytes(e: &BytesStart) -> Result<Self, ProjectError> {
        let name = decode_utf8(e.local_name().as_ref())?;
        let mut attrs = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| ProjectError::Parse(err.to_string()))?;
            let key = decode_utf8(attr.key.local_name().as_ref())?;
            let value = attr.unescape_value()?;
            attrs.insert(key, value.into_owned());
        }
        Ok(Self { name, attrs })
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attribute parsed as an integer; `default` when absent or malformed.
    pub fn attr_i64(&self, name: &str, default: i64) -> i64 {
        self.attr(name)
            .map(|v| v.trim().parse().unwrap_or(0))
            .unwrap_or(default)
    }

    /// True when the attribute is present with the literal value `true`.
    pub fn attr_bool(&self, name: &str) -> bool {
        self.attr(name) == Some("true")
    }
}

fn decode_utf8(raw: &[u8]) -> Result<String, ProjectError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|err| ProjectError::Parse(err.to_string()))
}

/// One pull event from a project document.
#[derive(Debug)]
pub enum XmlEvent {
    /// An opening tag (self-closing tags also produce a matching `End`).
    Start(StartTag),
    /// A closing tag.
    End(String),
    /// Character data between tags.
    Text(String),
    /// End of the physical document.
    Eof,
}

/// Pull-style token stream over one physical XML document.
///
/// Self-closing elements synthesize a matching `End` event so that entity
/// scan loops always see balanced tags.
pub struct XmlStream {
    reader: Reader<Box<dyn BufRead>>,
    buf: Vec<u8>,
    pending_end: Option<String>,
    source: PathBuf,
}

impl XmlStream {
    /// Wrap a buffered reader; `source` is the physical file being read,
    /// kept for diagnostics.
    pub fn new(reader: Box<dyn BufRead>, source: impl Into<PathBuf>) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            pending_end: None,
            source: source.into(),
        }
    }

    /// Stream over an in-memory document.
    pub fn from_bytes(data: Vec<u8>, source: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(std::io::Cursor::new(data)), source)
    }

    /// The physical file this stream reads from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Advance to the next structural event.
    pub fn next_event(&mut self) -> Result<XmlEvent, ProjectError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(XmlEvent::End(name));
        }
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => return Ok(XmlEvent::Start(StartTag::from_bytes(&e)?)),
                Ok(Event::Empty(e)) => {
                    let tag = StartTag::from_bytes(&e)?;
                    self.pending_end = Some(tag.name.clone());
                    return Ok(XmlEvent::Start(tag));
                }
                Ok(Event::End(e)) => return Ok(XmlEvent::End(decode_utf8(e.local_name().as_ref())?)),
                Ok(Event::Text(t)) => {
                    let text = t.unescape()?;
                    if !text.is_empty() {
                        return Ok(XmlEvent::Text(text.into_owned()));
                    }
                }
                Ok(Event::CData(c)) => return Ok(XmlEvent::Text(decode_utf8(c.as_ref())?)),
                Ok(Event::Eof) => return Ok(XmlEvent::Eof),
                Ok(_) => {}
                Err(err) => return Err(self.parse_error(err.to_string())),
            }
        }
    }

    /// Collect the character data of the element whose start tag was just
    /// consumed, leaving the stream past its end tag.
    pub fn read_element_text(&mut self, name: &str) -> Result<String, ProjectError> {
        let mut depth = 0usize;
        let mut text = String::new();
        loop {
            match self.next_event()? {
                XmlEvent::Start(tag) if tag.name == name => depth += 1,
                XmlEvent::Text(chunk) => text.push_str(&chunk),
                XmlEvent::End(end) if end == name => {
                    if depth == 0 {
                        return Ok(text);
                    }
                    depth -= 1;
                }
                XmlEvent::Eof => {
                    return Err(self.parse_error(format!("document ended inside <{name}>")))
                }
                _ => {}
            }
        }
    }

    /// Scan past the element whose start tag was just consumed, including any
    /// nested elements of the same name.
    pub fn skip_element(&mut self, name: &str) -> Result<(), ProjectError> {
        let mut depth = 0usize;
        loop {
            match self.next_event()? {
                XmlEvent::Start(tag) if tag.name == name => depth += 1,
                XmlEvent::End(end) if end == name => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                XmlEvent::Eof => {
                    return Err(self.parse_error(format!("document ended inside <{name}>")))
                }
                _ => {}
            }
        }
    }

    pub(crate) fn parse_error(&self, msg: impl std::fmt::Display) -> ProjectError {
        ProjectError::Parse(format!("{msg} (in {})", self.source.display()))
    }
}

// the boxed reader has no Debug of its own
impl std::fmt::Debug for XmlStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlStream")
            .field("source", &self.source)
            .field("pending_end", &self.pending_end)
            .finish_non_exhaustive()
    }
}

/// Skip leading document wrappers and return the first real start tag if it
/// matches `expected`; `None` signals "not this entity type".
pub fn seek_element(
    stream: &mut XmlStream,
    expected: &str,
) -> Result<Option<StartTag>, ProjectError> {
    loop {
        match stream.next_event()? {
            XmlEvent::Start(tag) if tag.name == "document" => {}
            XmlEvent::Start(tag) if tag.name == expected => return Ok(Some(tag)),
            XmlEvent::Start(_) => return Ok(None),
            XmlEvent::Eof => return Ok(None),
            _ => {}
        }
    }
}
