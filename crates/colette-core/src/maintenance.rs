//! Manifest maintenance
//!
//! Brings every manifest in a project up to date with the directory it
//! describes. Directories are visited breadth-first from the root; names
//! found on disk but missing from the manifest are appended in sorted order.
//! Existing lines are never reordered or removed, so authors keep control of
//! the document order.
//!
//! Unlike traversal, a failing directory does not stop the run. Its
//! diagnostic is recorded and the remaining directories are still processed.

use std::collections::{HashSet, VecDeque};
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};

use colette_fs::{ProjectPath, is_included};

use crate::manifest;
use crate::report::{Detail, Diagnostic, Operation};

/// Outcome of a maintenance run.
#[derive(Debug, Default)]
pub struct MaintenanceReport {
    /// Directories whose manifest was examined
    pub directories: usize,
    /// Lines appended across all manifests
    pub entries_added: usize,
    /// One diagnostic per directory that could not be processed
    pub failures: Vec<Diagnostic>,
}

impl MaintenanceReport {
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Synchronise every manifest under `root`.
pub fn run_maintenance(root: &ProjectPath) -> MaintenanceReport {
    let mut report = MaintenanceReport::default();
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(dir) = queue.pop_front() {
        report.directories += 1;
        match sync_directory(&dir, &mut queue) {
            Ok(added) => report.entries_added += added,
            Err(diagnostic) => {
                tracing::warn!(dir = %dir, "{}", diagnostic);
                report.failures.push(diagnostic);
            }
        }
    }

    tracing::debug!(
        directories = report.directories,
        added = report.entries_added,
        failures = report.failures.len(),
        "Maintenance finished"
    );
    report
}

/// A directory entry eligible for a manifest.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Child {
    name: String,
    is_dir: bool,
}

fn sync_directory(dir: &ProjectPath, queue: &mut VecDeque<ProjectPath>) -> Result<usize, Diagnostic> {
    let children = list_children(dir)?;

    for child in children.iter().filter(|c| c.is_dir) {
        let path = dir
            .join(&child.name)
            .map_err(|e| Diagnostic::path(Operation::HandleInit, e).at(dir))?;
        queue.push_back(path);
    }

    append_missing(dir, &children)
}

/// Included files and directories of `dir`, sorted by name.
fn list_children(dir: &ProjectPath) -> Result<Vec<Child>, Diagnostic> {
    let read_error =
        |e: io::Error| Diagnostic::io(Operation::HandleInit, Detail::ReadDirectory, e).at(dir);

    let mut children = Vec::new();
    for entry in fs::read_dir(dir.to_native()).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!(dir = %dir, name = ?raw, "Skipping name that is not valid UTF-8");
                continue;
            }
        };
        if !is_included(&name) {
            continue;
        }
        if name.starts_with(manifest::COMMENT) || name.contains(['\n', '\r']) {
            tracing::warn!(dir = %dir, name = %name, "Skipping name that cannot be a manifest line");
            continue;
        }

        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_dir() {
            children.push(Child { name, is_dir: true });
        } else if file_type.is_file() {
            children.push(Child { name, is_dir: false });
        }
    }

    children.sort();
    Ok(children)
}

/// Append every child missing from the manifest of `dir`, creating the
/// manifest if needed. Returns the number of lines appended.
fn append_missing(dir: &ProjectPath, children: &[Child]) -> Result<usize, Diagnostic> {
    let path = manifest::manifest_path(dir)
        .map_err(|e| Diagnostic::path(Operation::HandleInit, e).at(dir))?;
    let native = path.to_native();

    let is_link = fs::symlink_metadata(&native)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_link {
        return Err(Diagnostic::new(Operation::HandleInit, Detail::InvalidLink).at(&path));
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(&native)
        .map_err(|e| {
            let detail = Detail::for_open(&e);
            Diagnostic::io(Operation::HandleInit, detail, e).at(&path)
        })?;

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        let detail = if e.kind() == io::ErrorKind::InvalidData {
            Detail::IndexFormat
        } else {
            Detail::ReadFile
        };
        Diagnostic::io(Operation::HandleInit, detail, e).at(&path)
    })?;

    let existing: HashSet<&str> = manifest::entries(&content).collect();
    let missing: Vec<&str> = children
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| !existing.contains(name))
        .collect();
    if missing.is_empty() {
        return Ok(0);
    }

    let mut appended = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        appended.push('\n');
    }
    for name in &missing {
        appended.push_str(name);
        appended.push('\n');
        tracing::info!(manifest = %path, entry = %name, "Added manifest entry");
    }

    file.write_all(appended.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Diagnostic::io(Operation::HandleInit, Detail::WriteFile, e).at(&path))?;

    Ok(missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colette_test_utils::TestProject;
    use pretty_assertions::assert_eq;

    #[test]
    fn children_are_sorted_and_filtered() {
        let project = TestProject::new();
        project
            .file("b.md", "")
            .file("a.txt", "")
            .file(".hidden", "")
            .file("_notes.md", "")
            .file("#scratch", "")
            .dir("part");

        let dir = ProjectPath::new(project.root_str()).unwrap();
        let names: Vec<String> = list_children(&dir)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md", "part"]);
    }

    #[test]
    fn missing_final_newline_is_repaired_once() {
        let project = TestProject::new();
        project.manifest_raw("", "a.md").file("a.md", "").file("b.md", "");

        let dir = ProjectPath::new(project.root_str()).unwrap();
        let mut queue = VecDeque::new();
        assert_eq!(sync_directory(&dir, &mut queue).unwrap(), 1);
        assert_eq!(project.read_manifest(""), "a.md\nb.md\n");
        assert_eq!(sync_directory(&dir, &mut queue).unwrap(), 0);
        assert_eq!(project.read_manifest(""), "a.md\nb.md\n");
    }
}
