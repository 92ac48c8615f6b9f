use std::path::{Path, PathBuf};

use crate::xml::StartTag;

/// Placeholder substituted with the current file's base name.
pub const PROJECT_NAME_PLACEHOLDER: &str = "{projectname}";

/// Resolve a `path` reference attribute on the current element into the file
/// it points at. Without the attribute the current file is returned
/// unchanged (no redirection).
pub fn resolve_reference(tag: &StartTag, current_file: &Path) -> PathBuf {
    match tag.attr("path") {
        Some(raw) if !raw.is_empty() => resolve_path(raw, current_file),
        _ => current_file.to_path_buf(),
    }
}

/// Resolve a reference path against the file it was found in: substitute the
/// `{projectname}` placeholder with the current file's base name, then join
/// onto the current file's parent directory. Pure path arithmetic, no I/O.
pub fn resolve_path(raw: &str, current_file: &Path) -> PathBuf {
    let relative = if raw.contains(PROJECT_NAME_PLACEHOLDER) {
        raw.replace(PROJECT_NAME_PLACEHOLDER, &base_name(current_file))
    } else {
        raw.to_string()
    };

    let parent = current_file.parent().unwrap_or_else(|| Path::new("."));
    parent.join(relative)
}

// File name up to the first dot, directory stripped ("scan.files.psx" has
// base name "scan", not "scan.files").
fn base_name(file: &Path) -> String {
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}
