//! Error types for colette-core

/// Result type for colette-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in colette-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A run failed; the diagnostic says where and why
    #[error(transparent)]
    Diagnostic(#[from] crate::report::Diagnostic),

    /// Title cannot be used to name outputs
    #[error("Invalid title '{title}': {reason}")]
    InvalidTitle { title: String, reason: &'static str },

    /// Padding outside the supported range
    #[error("Invalid padding '{value}': must be a value from {min} to {max}")]
    InvalidPadding { value: String, min: u32, max: u32 },

    /// Maximum depth outside the supported range
    #[error("Invalid maximum depth {value}: must be a value from 1 to {max}")]
    InvalidDepth { value: usize, max: usize },

    /// Filesystem error from colette-fs
    #[error(transparent)]
    Fs(#[from] colette_fs::Error),
}

impl Error {
    /// The diagnostic behind a failed run, if this is one.
    pub fn diagnostic(&self) -> Option<&crate::report::Diagnostic> {
        match self {
            Self::Diagnostic(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

impl From<colette_fs::PathError> for Error {
    fn from(err: colette_fs::PathError) -> Self {
        Self::Fs(err.into())
    }
}
