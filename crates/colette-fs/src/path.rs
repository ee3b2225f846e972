//! Bounds-checked path construction
//!
//! Paths are owned strings whose length is validated when they are built,
//! so a [`ProjectPath`] never exceeds [`MAX_PATH_LEN`]. Manifest names are
//! joined onto their declaring directory with [`join_path`], which refuses
//! absolute names and `..` components.

use std::path::{Path, PathBuf};

use crate::PathError;
use crate::constants::{MAX_EXT_LEN, MAX_NAME_LEN, MAX_PATH_LEN};

const SEPARATOR: char = '/';

/// A path built by the path-safety layer.
///
/// Uses `/` as separator and is guaranteed to be at most
/// [`MAX_PATH_LEN`] bytes long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectPath {
    inner: String,
}

impl ProjectPath {
    /// Validate an existing path string, typically the project root.
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let inner = path.into();
        if inner.is_empty() {
            return Err(PathError::Empty);
        }
        if inner.len() > MAX_PATH_LEN {
            return Err(PathError::TooLong {
                len: inner.len(),
                max: MAX_PATH_LEN,
            });
        }
        Ok(Self { inner })
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a `PathBuf` for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join a manifest name onto this directory. See [`join_path`].
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        join_path(&self.inner, name)
    }

    /// Append an extension to the final component. See [`join_extension`].
    pub fn with_extension(&self, ext: &str) -> Result<Self, PathError> {
        join_extension(&self.inner, ext)
    }

    /// The final component. See [`basename`].
    pub fn basename(&self) -> Result<&str, PathError> {
        basename(&self.inner)
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Join `file` onto `dir` with exactly one separator between them.
///
/// # Errors
///
/// - [`PathError::Empty`] if either input is empty
/// - [`PathError::AbsoluteNotAllowed`] if `file` is absolute
/// - [`PathError::NameTooLong`] if `file` exceeds [`MAX_NAME_LEN`]
/// - [`PathError::EscapesDirectory`] if `file` has a `..` component
/// - [`PathError::TooLong`] if the result would exceed [`MAX_PATH_LEN`]
pub fn join_path(dir: &str, file: &str) -> Result<ProjectPath, PathError> {
    if dir.is_empty() || file.is_empty() {
        return Err(PathError::Empty);
    }
    if file.starts_with(SEPARATOR) || Path::new(file).has_root() {
        return Err(PathError::AbsoluteNotAllowed);
    }
    if file.len() > MAX_NAME_LEN {
        return Err(PathError::NameTooLong {
            len: file.len(),
            max: MAX_NAME_LEN,
        });
    }
    if file.split(SEPARATOR).any(|component| component == "..") {
        return Err(PathError::EscapesDirectory);
    }

    let needs_separator = !dir.ends_with(SEPARATOR);
    let len = dir.len() + usize::from(needs_separator) + file.len();
    if len > MAX_PATH_LEN {
        return Err(PathError::TooLong {
            len,
            max: MAX_PATH_LEN,
        });
    }

    let mut inner = String::with_capacity(len);
    inner.push_str(dir);
    if needs_separator {
        inner.push(SEPARATOR);
    }
    inner.push_str(file);
    Ok(ProjectPath { inner })
}

/// Append `ext` to the basename of `file`.
///
/// A trailing separator on `file` is dropped first, so `notes/` and `notes`
/// both become `notes.md`.
///
/// # Errors
///
/// - [`PathError::Empty`] if either input is empty or `file` has no basename
/// - [`PathError::BufferTooLarge`] if `ext` exceeds [`MAX_EXT_LEN`]
/// - [`PathError::InvalidExtension`] if `ext` is not `.` plus a name
/// - [`PathError::NameTooLong`] if the extended basename exceeds [`MAX_NAME_LEN`]
/// - [`PathError::TooLong`] if the result would exceed [`MAX_PATH_LEN`]
pub fn join_extension(file: &str, ext: &str) -> Result<ProjectPath, PathError> {
    if file.is_empty() || ext.is_empty() {
        return Err(PathError::Empty);
    }
    if ext.len() > MAX_EXT_LEN {
        return Err(PathError::BufferTooLarge {
            len: ext.len(),
            max: MAX_EXT_LEN,
        });
    }
    if !is_valid_extension(ext) {
        return Err(PathError::InvalidExtension);
    }

    let stem = file.trim_end_matches(SEPARATOR);
    if stem.is_empty() {
        return Err(PathError::Empty);
    }

    let base = basename(stem)?;
    if base.len() + ext.len() > MAX_NAME_LEN {
        return Err(PathError::NameTooLong {
            len: base.len() + ext.len(),
            max: MAX_NAME_LEN,
        });
    }

    let len = stem.len() + ext.len();
    if len > MAX_PATH_LEN {
        return Err(PathError::TooLong {
            len,
            max: MAX_PATH_LEN,
        });
    }

    let mut inner = String::with_capacity(len);
    inner.push_str(stem);
    inner.push_str(ext);
    Ok(ProjectPath { inner })
}

/// Extract the final component of `path`, ignoring trailing separators.
///
/// A path made only of separators yields `/`.
pub fn basename(path: &str) -> Result<&str, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Ok("/");
    }

    let base = trimmed
        .rsplit_once(SEPARATOR)
        .map_or(trimmed, |(_, base)| base);
    if base.len() > MAX_NAME_LEN {
        return Err(PathError::NameTooLong {
            len: base.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(base)
}

pub(crate) fn is_valid_extension(ext: &str) -> bool {
    ext.len() > 1
        && ext.starts_with('.')
        && !ext.contains(SEPARATOR)
        && !ext.contains('\0')
        && ext != ".."
}
