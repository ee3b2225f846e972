//! [`TestProject`] builder for writing-project test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the per-directory manifest.
pub const MANIFEST: &str = ".index";

/// A temporary project directory with helpers for building fragment trees.
///
/// # Example
///
/// ```rust,no_run
/// use colette_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project
///     .manifest("", &["intro.md", "part1"])
///     .file("intro.md", "# Intro\n")
///     .manifest("part1", &["scene"])
///     .file("part1/scene.md", "Scene.\n");
/// project.assert_file_exists("part1/.index");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the canonical root path of the project.
    ///
    /// Canonical so that paths compare equal to what the CLI derives.
    pub fn root(&self) -> PathBuf {
        fs::canonicalize(self.temp_dir.path()).unwrap()
    }

    /// Return the canonical root path as a string.
    pub fn root_str(&self) -> String {
        self.root().to_str().unwrap().to_string()
    }

    /// Absolute path of `rel` inside the project.
    pub fn path(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root()
        } else {
            self.root().join(rel)
        }
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        self.file_bytes(rel, content.as_bytes())
    }

    /// Write raw bytes to a file, creating parent directories.
    pub fn file_bytes(&self, rel: &str, content: &[u8]) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    /// Create a directory and its parents.
    pub fn dir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path(rel)).unwrap();
        self
    }

    /// Write the manifest of directory `rel` with one entry per line.
    pub fn manifest(&self, rel: &str, entries: &[&str]) -> &Self {
        let mut content = entries.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        self.manifest_raw(rel, &content)
    }

    /// Write the manifest of directory `rel` verbatim.
    pub fn manifest_raw(&self, rel: &str, content: &str) -> &Self {
        self.dir(rel);
        let path = self.path(rel).join(MANIFEST);
        fs::write(path, content).unwrap();
        self
    }

    /// Create a symbolic link at `link` pointing to `target`, both relative
    /// to the project root.
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, link: &str) -> &Self {
        std::os::unix::fs::symlink(self.path(target), self.path(link)).unwrap();
        self
    }

    /// Read a file as text.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read a file as bytes.
    pub fn read_bytes(&self, rel: &str) -> Vec<u8> {
        let path = self.path(rel);
        fs::read(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read the manifest of directory `rel`.
    pub fn read_manifest(&self, rel: &str) -> String {
        let path = Path::new(rel).join(MANIFEST);
        self.read(path.to_str().unwrap())
    }

    /// Sorted names inside directory `rel`.
    pub fn list_dir(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(rel))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `rel` exists (without following a final symlink).
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            fs::symlink_metadata(&full_path).is_ok(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            fs::symlink_metadata(&full_path).is_err(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
