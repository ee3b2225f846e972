//! Manifest traversal
//!
//! A depth-first, pre-order walk over a project driven by an explicit stack
//! of open manifests. The top of the stack is the directory currently being
//! read; its length is the current nesting depth. Directories named in a
//! manifest are expanded in place and only regular files are yielded.
//!
//! Any structural problem aborts the whole walk: every open manifest is
//! closed and the failure is returned. A traversal that has failed or
//! finished yields nothing further.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};

use colette_fs::{EntryResolver, ProjectPath, Resolution, is_included_entry};

use crate::manifest;
use crate::report::{Detail, Diagnostic, Operation};

/// Stack capacity reserved before the first descent.
pub const INITIAL_STACK_DEPTH: usize = 5;

/// Kind of a resolved manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    RegularFile,
    /// Exists but is neither of the above
    Unknown,
}

/// A manifest entry resolved to a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub path: ProjectPath,
    pub kind: EntryKind,
    /// The name as written in the manifest
    pub name: String,
    /// Nesting depth of the declaring directory, the root being 1
    pub depth: usize,
}

/// One open manifest and the directory it describes.
#[derive(Debug)]
struct ManifestCursor {
    dir: ProjectPath,
    reader: BufReader<File>,
    line: String,
}

impl ManifestCursor {
    fn open(dir: &ProjectPath, operation: Operation) -> Result<Self, Diagnostic> {
        let path = manifest::manifest_path(dir)
            .map_err(|e| Diagnostic::path(operation, e).at(dir))?;
        let native = path.to_native();

        match fs::symlink_metadata(&native) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(Diagnostic::new(operation, Detail::InvalidLink).at(&path));
            }
            Ok(_) => {}
            Err(e) => return Err(Self::open_failure(operation, &path, e)),
        }

        let file = File::open(&native).map_err(|e| Self::open_failure(operation, &path, e))?;
        Ok(Self {
            dir: dir.clone(),
            reader: BufReader::new(file),
            line: String::new(),
        })
    }

    fn open_failure(operation: Operation, path: &ProjectPath, err: io::Error) -> Diagnostic {
        let detail = match err.kind() {
            io::ErrorKind::NotFound => Detail::IndexMissing,
            io::ErrorKind::PermissionDenied => Detail::AccessDenied,
            _ => Detail::OpenFile,
        };
        Diagnostic::io(operation, detail, err).at(path)
    }

    /// The next raw line, or `None` at end of file.
    fn next_line(&mut self) -> Result<Option<&str>, Diagnostic> {
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(self.line.as_str())),
            Err(e) => {
                let detail = if e.kind() == io::ErrorKind::InvalidData {
                    Detail::IndexFormat
                } else {
                    Detail::ReadFile
                };
                Err(Diagnostic::io(Operation::IterNext, detail, e).at(&self.dir))
            }
        }
    }
}

/// Depth-first walk over a project's manifests.
#[derive(Debug)]
pub struct Traversal {
    stack: Vec<ManifestCursor>,
    max_depth: usize,
    resolver: EntryResolver,
}

impl Traversal {
    /// Open the root manifest and position the walk before its first line.
    ///
    /// # Errors
    ///
    /// Fails if the root manifest cannot be opened.
    pub fn start(
        root: &ProjectPath,
        resolver: EntryResolver,
        max_depth: usize,
    ) -> Result<Self, Diagnostic> {
        let mut traversal = Self {
            stack: Vec::with_capacity(INITIAL_STACK_DEPTH.min(max_depth)),
            max_depth,
            resolver,
        };
        traversal.push(root, Operation::IterInit)?;
        Ok(traversal)
    }

    /// Current nesting depth; zero once the walk is over.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, dir: &ProjectPath, operation: Operation) -> Result<(), Diagnostic> {
        if self.stack.len() >= self.max_depth {
            return Err(Diagnostic::new(operation, Detail::TooDeep).at(dir));
        }
        if self.stack.len() == self.stack.capacity() {
            let target = (self.stack.capacity() * 2).clamp(1, self.max_depth);
            self.stack.reserve_exact(target - self.stack.len());
        }

        let cursor = ManifestCursor::open(dir, operation)?;
        self.stack.push(cursor);
        tracing::debug!(dir = %dir, depth = self.stack.len(), "Entered directory");
        Ok(())
    }

    fn pop(&mut self) {
        if let Some(cursor) = self.stack.pop() {
            tracing::debug!(dir = %cursor.dir, depth = self.stack.len(), "Left directory");
        }
    }

    /// Close every open manifest, innermost first.
    fn abort(&mut self) {
        while !self.stack.is_empty() {
            self.pop();
        }
    }

    /// Advance to the next regular file.
    ///
    /// Returns `Ok(None)` once every manifest is exhausted. On error the
    /// walk is aborted before returning.
    pub fn next_entry(&mut self) -> Result<Option<ResolvedEntry>, Diagnostic> {
        let result = self.advance();
        if result.is_err() {
            self.abort();
        }
        result
    }

    fn advance(&mut self) -> Result<Option<ResolvedEntry>, Diagnostic> {
        loop {
            let depth = self.stack.len();
            let Some(top) = self.stack.last_mut() else {
                return Ok(None);
            };

            let name = match top.next_line()? {
                None => {
                    self.pop();
                    continue;
                }
                Some(line) => match manifest::entry_name(line) {
                    Some(name) => name.to_string(),
                    None => continue,
                },
            };
            if !is_included_entry(&name) {
                tracing::trace!(name = %name, "Skipping excluded entry");
                continue;
            }

            let dir = top.dir.clone();
            let resolution = self
                .resolver
                .resolve(&dir, &name)
                .map_err(|e| Diagnostic::path(Operation::IterNext, e).at(&name))?;

            match resolution {
                Resolution::Directory(path) => {
                    self.push(&path, Operation::IterPush)?;
                }
                Resolution::File { path, .. } => {
                    tracing::debug!(path = %path, "Next file");
                    return Ok(Some(ResolvedEntry {
                        path,
                        kind: EntryKind::RegularFile,
                        name,
                        depth,
                    }));
                }
                Resolution::Symlink(path) => {
                    return Err(Diagnostic::new(Operation::IterNext, Detail::InvalidLink).at(path));
                }
                Resolution::NotFound(path) => {
                    return Err(Diagnostic::new(Operation::IterNext, Detail::FileNotFound).at(path));
                }
                Resolution::AccessDenied(path) => {
                    return Err(Diagnostic::new(Operation::IterNext, Detail::AccessDenied).at(path));
                }
                Resolution::Error(path) => {
                    return Err(Diagnostic::new(Operation::IterNext, Detail::InvalidPath).at(path));
                }
            }
        }
    }
}

impl Iterator for Traversal {
    type Item = Result<ResolvedEntry, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colette_test_utils::TestProject;

    fn root(project: &TestProject) -> ProjectPath {
        ProjectPath::new(project.root_str()).unwrap()
    }

    #[test]
    fn deep_tree_at_the_limit_is_walked() {
        let project = TestProject::new();
        project.manifest("", &["a"]);
        let mut dir = String::from("a");
        for level in 0..7 {
            let child = format!("{dir}/d{level}");
            project.manifest(&dir, &[&format!("d{level}")]);
            dir = child;
        }
        project.manifest(&dir, &[]);

        let mut traversal = Traversal::start(&root(&project), EntryResolver::default(), 9).unwrap();
        assert!(traversal.stack.capacity() >= INITIAL_STACK_DEPTH);
        assert!(traversal.next_entry().unwrap().is_none());
        assert_eq!(traversal.depth(), 0);
    }

    #[test]
    fn capacity_never_exceeds_the_limit_when_growing() {
        let project = TestProject::new();
        project.manifest("", &[]);
        let mut dir = String::new();
        for level in 0..6 {
            dir = if dir.is_empty() { format!("d{level}") } else { format!("{dir}/d{level}") };
            project.manifest(&dir, &[]);
        }

        let root = root(&project);
        let mut traversal = Traversal::start(&root, EntryResolver::default(), 7).unwrap();
        let mut path = root;
        for level in 0..6 {
            path = path.join(&format!("d{level}")).unwrap();
            traversal.push(&path, Operation::IterPush).unwrap();
        }
        assert_eq!(traversal.depth(), 7);
        assert!(traversal.stack.capacity() >= 7);

        let err = traversal
            .push(&path.join("d6").unwrap(), Operation::IterPush)
            .unwrap_err();
        assert_eq!(err.detail(), Detail::TooDeep);
    }

    #[test]
    fn small_limit_caps_initial_capacity() {
        let project = TestProject::new();
        project.manifest("", &[]);
        let traversal = Traversal::start(&root(&project), EntryResolver::default(), 2).unwrap();
        assert!(traversal.stack.capacity() >= 1);
        assert_eq!(traversal.depth(), 1);
    }

    #[test]
    fn failure_closes_every_cursor() {
        let project = TestProject::new();
        project.manifest("", &["part"]);
        project.manifest("part", &["missing"]);

        let mut traversal = Traversal::start(&root(&project), EntryResolver::default(), 8).unwrap();
        let err = traversal.next_entry().unwrap_err();
        assert_eq!(err.detail(), Detail::FileNotFound);
        assert_eq!(traversal.depth(), 0);
        assert!(traversal.next_entry().unwrap().is_none());
    }
}
