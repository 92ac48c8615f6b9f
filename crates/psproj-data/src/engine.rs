use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::resolver::resolve_reference;
use crate::stream::open_project_stream;
use crate::xml::{StartTag, XmlEvent, XmlStream};

/// Stack of the physical files currently being traversed. The top is the
/// file the current token stream reads from; entries below it are suspended
/// outer documents. The root file is never popped.
#[derive(Debug)]
pub struct FileStack {
    root: PathBuf,
    frames: Vec<PathBuf>,
}

impl FileStack {
    /// Start a stack at the root project file.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            frames: Vec::new(),
        }
    }

    /// The file backing the current stream.
    pub fn top(&self) -> &Path {
        self.frames.last().unwrap_or(&self.root)
    }

    /// Number of open frames, including the root.
    pub fn depth(&self) -> usize {
        self.frames.len() + 1
    }

    pub(crate) fn push(&mut self, file: PathBuf) {
        self.frames.push(file);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }
}

/// Follow a `path` reference on the current element, if present.
///
/// Returns a stream over the referenced file with its path pushed onto the
/// stack, or `None` when the element carries no reference. Callers own the
/// symmetry: after consuming the exploded region they must `pop` the stack
/// and drop the inner stream on every exit path, restoring the outer stream
/// as current. The stack is left untouched when the referenced file cannot
/// be opened.
pub fn explode_tag(
    tag: &StartTag,
    stack: &mut FileStack,
) -> Result<Option<XmlStream>, ProjectError> {
    if tag.attr("path").map_or(true, str::is_empty) {
        return Ok(None);
    }

    let target = resolve_reference(tag, stack.top());
    log::debug!("following <{}> reference to {}", tag.name, target.display());

    let stream = open_project_stream(&target)?;
    stack.push(target);
    Ok(Some(stream))
}

/// One dispatch hook per owning entity type, invoked by
/// [`read_element_array`] for each array element in document order.
pub trait ElementDispatcher {
    /// Consume one array element. The stream is positioned just past the
    /// element's start tag, which is passed in.
    fn on_element(
        &mut self,
        stream: &mut XmlStream,
        stack: &mut FileStack,
        tag: &StartTag,
    ) -> Result<(), ProjectError>;

    /// Handle a loose `property` element found between array elements
    /// (depth-map arrays carry these).
    fn on_property(&mut self, name: &str, value: &str) {
        log::debug!("ignoring property '{name}' = '{value}' inside array");
    }
}

/// Log-and-continue default for element names no dispatcher claims.
pub fn unhandled_element(name: &str) {
    log::warn!("no handler for array element <{name}>, skipping");
}

/// Scan an XML-encoded array: dispatch every `element_tag` start in document
/// order until the matching `array_tag` end (or the end of the document).
///
/// A dispatch failure abandons that element only; scanning resumes with the
/// next sibling. Failures to advance the stream itself propagate.
pub fn read_element_array<D: ElementDispatcher + ?Sized>(
    stream: &mut XmlStream,
    stack: &mut FileStack,
    array_tag: &str,
    element_tag: &str,
    dispatcher: &mut D,
) -> Result<(), ProjectError> {
    loop {
        match stream.next_event()? {
            XmlEvent::Start(tag) if tag.name == element_tag => {
                if let Err(err) = dispatcher.on_element(stream, stack, &tag) {
                    log::warn!("skipping malformed <{element_tag}> in <{array_tag}>: {err}");
                }
            }
            XmlEvent::Start(tag) if tag.name == "property" => {
                dispatcher.on_property(
                    tag.attr("name").unwrap_or_default(),
                    tag.attr("value").unwrap_or_default(),
                );
            }
            XmlEvent::End(name) if name == array_tag => return Ok(()),
            XmlEvent::Eof => return Ok(()),
            _ => {}
        }
    }
}
