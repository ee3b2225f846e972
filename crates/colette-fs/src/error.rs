//! Error types for colette-fs

use std::path::PathBuf;

/// Result type for colette-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons the path-safety layer refuses to build a path.
///
/// Each variant is a distinct code so callers can branch on the kind of
/// failure instead of matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty path input")]
    Empty,

    #[error("path of {len} bytes exceeds the {max} byte limit")]
    TooLong { len: usize, max: usize },

    #[error("absolute path not allowed")]
    AbsoluteNotAllowed,

    #[error("name of {len} bytes exceeds the {max} byte limit")]
    NameTooLong { len: usize, max: usize },

    #[error("extension of {len} bytes exceeds the {max} byte buffer")]
    BufferTooLarge { len: usize, max: usize },

    #[error("extension must start with '.' followed by a single name component")]
    InvalidExtension,

    #[error("'..' component escapes the declaring directory")]
    EscapesDirectory,
}

/// Errors that can occur in colette-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
