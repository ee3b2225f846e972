//! Diagnostic composition
//!
//! Every failure the engine reports is built from the same four parts: the
//! operation that was under way, the path involved (if any), a detail code
//! from a fixed taxonomy and the underlying system error (if any). The
//! rendered form reads:
//!
//! ```text
//! Error getting next file for /novel/part1/scene: File not found
//! Error initializing project for /novel/notes: Unable to read directory (Permission denied (os error 13))
//! ```

use std::fmt;
use std::io;

use colette_fs::PathError;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What the engine was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Opening the root manifest
    IterInit,
    /// Descending into a subdirectory
    IterPush,
    /// Reading and resolving the next manifest line
    IterNext,
    /// Preparing the output file or directory
    CtxOutput,
    /// Check mode
    HandleCheck,
    /// Manifest maintenance
    HandleInit,
    /// List mode
    HandleList,
    /// Collate mode
    HandleCollate,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IterInit => "initializing file iterator",
            Self::IterPush => "adding directory to processing queue",
            Self::IterNext => "getting next file",
            Self::CtxOutput => "setting output location",
            Self::HandleCheck => "checking project structure",
            Self::HandleInit => "initializing project",
            Self::HandleList => "creating file listing",
            Self::HandleCollate => "combining files",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    // Path construction
    EmptyPath,
    PathTooLong,
    NameTooLong,
    AbsolutePath,
    EscapesDirectory,
    BufferOverflow,
    InvalidExtension,

    // Resolution
    InvalidLink,
    FileNotFound,
    AccessDenied,
    InvalidPath,

    // Project structure
    IndexMissing,
    IndexFormat,
    TooDeep,
    TooManyFiles,

    // I/O
    OpenFile,
    ReadFile,
    WriteFile,
    ReadDirectory,
    InvalidOutput,
}

impl Detail {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPath => "Empty path or name",
            Self::PathTooLong => "Path exceeds maximum allowed length",
            Self::NameTooLong => "Name component too long",
            Self::AbsolutePath => "Absolute path not allowed in index file",
            Self::EscapesDirectory => "Path escapes its directory",
            Self::BufferOverflow => "Extension exceeds maximum allowed length",
            Self::InvalidExtension => "Invalid file extension",
            Self::InvalidLink => "Symbolic links not permitted",
            Self::FileNotFound => "File not found",
            Self::AccessDenied => "Permission denied for operation",
            Self::InvalidPath => "Invalid path",
            Self::IndexMissing => "Required .index file not found",
            Self::IndexFormat => "Invalid .index file format",
            Self::TooDeep => "Project hierarchy exceeds maximum depth",
            Self::TooManyFiles => "Project contains too many files",
            Self::OpenFile => "Unable to open file",
            Self::ReadFile => "Unable to read file",
            Self::WriteFile => "Unable to write file",
            Self::ReadDirectory => "Unable to read directory",
            Self::InvalidOutput => "Output location is not usable",
        }
    }

    /// Detail for an I/O failure while opening something for reading.
    pub fn for_open(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound,
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            _ => Self::OpenFile,
        }
    }
}

impl From<PathError> for Detail {
    fn from(err: PathError) -> Self {
        match err {
            PathError::Empty => Self::EmptyPath,
            PathError::TooLong { .. } => Self::PathTooLong,
            PathError::AbsoluteNotAllowed => Self::AbsolutePath,
            PathError::NameTooLong { .. } => Self::NameTooLong,
            PathError::BufferTooLarge { .. } => Self::BufferOverflow,
            PathError::InvalidExtension => Self::InvalidExtension,
            PathError::EscapesDirectory => Self::EscapesDirectory,
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composed, human-readable failure report.
#[derive(Debug)]
pub struct Diagnostic {
    operation: Operation,
    path: Option<String>,
    detail: Detail,
    source: Option<Source>,
}

impl Diagnostic {
    pub fn new(operation: Operation, detail: Detail) -> Self {
        Self {
            operation,
            path: None,
            detail,
            source: None,
        }
    }

    /// Diagnostic for a path the path-safety layer refused to build.
    pub fn path(operation: Operation, err: PathError) -> Self {
        Self::new(operation, err.into())
    }

    /// Diagnostic for an I/O failure, keeping the system error text.
    pub fn io(operation: Operation, detail: Detail, err: io::Error) -> Self {
        Self::new(operation, detail).caused_by(err)
    }

    /// Attach the path the failure concerns.
    pub fn at(mut self, path: impl fmt::Display) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Attach the underlying error.
    pub fn caused_by(mut self, source: impl Into<Source>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn detail(&self) -> Detail {
        self.detail
    }

    pub fn location(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}", self.operation)?;
        if let Some(path) = &self.path {
            write!(f, " for {}", path)?;
        }
        write!(f, ": {}", self.detail)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_operation_and_detail() {
        let diagnostic = Diagnostic::new(Operation::IterNext, Detail::FileNotFound);
        insta::assert_snapshot!(diagnostic.to_string(), @"Error getting next file: File not found");
    }

    #[test]
    fn renders_path() {
        let diagnostic =
            Diagnostic::new(Operation::IterPush, Detail::IndexMissing).at("/novel/part1");
        insta::assert_snapshot!(
            diagnostic.to_string(),
            @"Error adding directory to processing queue for /novel/part1: Required .index file not found"
        );
    }

    #[test]
    fn renders_system_error() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let diagnostic =
            Diagnostic::io(Operation::HandleInit, Detail::ReadDirectory, err).at("/novel/notes");
        insta::assert_snapshot!(
            diagnostic.to_string(),
            @"Error initializing project for /novel/notes: Unable to read directory (denied)"
        );
        assert!(std::error::Error::source(&diagnostic).is_some());
    }

    #[test]
    fn path_errors_keep_their_kind() {
        let diagnostic = Diagnostic::path(Operation::IterNext, PathError::AbsoluteNotAllowed);
        assert_eq!(diagnostic.detail(), Detail::AbsolutePath);
        assert_eq!(diagnostic.operation(), Operation::IterNext);
        assert_eq!(diagnostic.location(), None);
    }

    #[test]
    fn open_failures_map_to_details() {
        let not_found = io::Error::from(io::ErrorKind::NotFound);
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let other = io::Error::other("boom");
        assert_eq!(Detail::for_open(&not_found), Detail::FileNotFound);
        assert_eq!(Detail::for_open(&denied), Detail::AccessDenied);
        assert_eq!(Detail::for_open(&other), Detail::OpenFile);
    }
}
