//! Limits and well-known file names of a Colette project.

use std::path::Path;

/// Longest path, in bytes, the path-safety layer will construct.
pub const MAX_PATH_LEN: usize = 4095;

/// Longest single name component, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Longest content extension, in bytes, including the leading dot.
pub const MAX_EXT_LEN: usize = 15;

/// Content extensions probed when a manifest name has no exact match.
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".md", ".txt"];

/// Files with a fixed name inside a project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFile {
    /// The per-directory `.index` manifest
    Manifest,
    /// The optional `.colette.toml` settings file at the project root
    Settings,
}

impl ProjectFile {
    /// Get the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => ".index",
            Self::Settings => ".colette.toml",
        }
    }
}

impl AsRef<Path> for ProjectFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
