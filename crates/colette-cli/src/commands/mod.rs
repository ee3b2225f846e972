//! Command implementations for colette-cli

pub mod init;
pub mod pandoc;
pub mod process;

pub use init::run_init;
pub use pandoc::run_check_pandoc;
pub use process::{Overrides, run_process};

use std::path::Path;

use colette_fs::ProjectPath;

use crate::error::{CliError, Result};

/// Canonicalize `dir` into the project root.
///
/// The directory must exist, be a directory and have a UTF-8 path.
pub fn project_root(dir: &Path) -> Result<ProjectPath> {
    let canonical = dunce::canonicalize(dir).map_err(|e| {
        CliError::user(format!("Cannot access project directory {}: {}", dir.display(), e))
    })?;
    if !canonical.is_dir() {
        return Err(CliError::user(format!(
            "Not a directory: {}",
            canonical.display()
        )));
    }
    let path = canonical.to_str().ok_or_else(|| {
        CliError::user(format!(
            "Project directory is not valid UTF-8: {}",
            canonical.display()
        ))
    })?;

    tracing::debug!(root = %path, "Resolved project root");
    Ok(ProjectPath::new(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn project_root_is_canonical() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("novel")).unwrap();

        let root = project_root(&temp.path().join("novel").join("..").join("novel")).unwrap();
        let expected = dunce::canonicalize(temp.path().join("novel")).unwrap();
        assert_eq!(root.as_str(), expected.to_str().unwrap());
    }

    #[test]
    fn project_root_rejects_files_and_missing_paths() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.md"), "").unwrap();

        assert!(matches!(
            project_root(&temp.path().join("a.md")),
            Err(CliError::User { .. })
        ));
        assert!(matches!(
            project_root(&temp.path().join("missing")),
            Err(CliError::User { .. })
        ));
    }
}
