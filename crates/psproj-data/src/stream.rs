use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::ProjectError;
use crate::xml::XmlStream;

/// Conventional name of the root document entry inside archive containers.
pub const DOC_ENTRY: &str = "doc.xml";

/// Open a token stream for a project file, branching on its extension.
///
/// Archive containers (`psz`/`zip`) are expected to hold the document as a
/// `doc.xml` entry; plain files (`psx`/`xml`) are streamed directly. Anything
/// else is an unsupported format. Failure to open the underlying file or
/// entry is fatal for the branch of parsing that requested the stream.
pub fn open_project_stream(path: impl AsRef<Path>) -> Result<XmlStream, ProjectError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "psz" | "zip" => open_archive_entry(path, DOC_ENTRY),
        "psx" | "xml" => {
            let file = File::open(path)?;
            Ok(XmlStream::new(Box::new(BufReader::new(file)), path))
        }
        _ => Err(ProjectError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Open a token stream over a named XML entry inside an archive container.
pub fn open_archive_entry(path: &Path, entry: &str) -> Result<XmlStream, ProjectError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut data = Vec::new();
    archive.by_name(entry)?.read_to_end(&mut data)?;
    Ok(XmlStream::from_bytes(data, path))
}
