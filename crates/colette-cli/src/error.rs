//! Error types for colette-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from colette-core
    #[error(transparent)]
    Core(#[from] colette_core::Error),

    /// Error from colette-fs
    #[error(transparent)]
    Fs(#[from] colette_fs::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

impl From<colette_fs::PathError> for CliError {
    fn from(err: colette_fs::PathError) -> Self {
        Self::Fs(err.into())
    }
}
