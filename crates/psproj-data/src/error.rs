/// An error type for the project reader.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Error reading a project file from disk.
    #[error("failed to read project file: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension is not a recognized project format.
    #[error("unsupported project file type: {0}")]
    UnsupportedFormat(std::path::PathBuf),

    /// Error opening an archive container or one of its entries.
    #[error("failed to read project archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Malformed XML reported by the underlying reader.
    #[error("malformed project XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Unexpected token sequence while scanning an element.
    #[error("unexpected project XML structure: {0}")]
    Parse(String),
}
