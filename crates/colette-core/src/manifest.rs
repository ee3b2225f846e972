//! Manifest line format
//!
//! One entry name per line. Empty lines, whitespace-only lines and lines
//! starting with `#` carry no entry. A missing final newline is accepted.

use colette_fs::{PathError, ProjectFile, ProjectPath};

/// The character that starts a comment line.
pub const COMMENT: char = '#';

/// Strip the line terminator from a raw manifest line.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// The entry name on a manifest line, or `None` for blank and comment lines.
pub fn entry_name(line: &str) -> Option<&str> {
    let line = trim_line_ending(line);
    if line.trim().is_empty() || line.starts_with(COMMENT) {
        None
    } else {
        Some(line)
    }
}

/// Every entry name in manifest text, in order.
pub fn entries(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter_map(entry_name)
}

/// Path of the manifest inside `dir`.
pub fn manifest_path(dir: &ProjectPath) -> Result<ProjectPath, PathError> {
    dir.join(ProjectFile::Manifest.as_str())
}
