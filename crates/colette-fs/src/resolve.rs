//! Manifest entry resolution
//!
//! Turns a name read from a manifest into a concrete filesystem entry.
//! Resolution never follows symbolic links: finding one is an outcome of its
//! own, which callers treat as a failure.

use std::fs;
use std::io::ErrorKind;

use crate::constants::{DEFAULT_EXTENSIONS, MAX_EXT_LEN};
use crate::path::is_valid_extension;
use crate::{PathError, ProjectPath};

/// Whether a directory entry or manifest name takes part in a project.
///
/// Names starting with `.` are hidden or system files (including the
/// manifests themselves). Names starting with `_` are deliberately ignored
/// by the author, and generated outputs are named `_<title>_` so they are
/// never picked up again.
pub fn is_included(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.starts_with('_')
}

/// Whether a manifest name, which may contain `/`, takes part in a project.
///
/// Every component must pass [`is_included`], so `part/_notes.md` and
/// `.drafts/a.md` are both excluded. Empty components from doubled or
/// trailing separators are ignored.
pub fn is_included_entry(name: &str) -> bool {
    let mut components = name.split('/').filter(|c| !c.is_empty()).peekable();
    components.peek().is_some() && components.all(is_included)
}

/// Ordered list of content extensions probed during resolution.
///
/// Earlier extensions win over later ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions(Vec<String>);

impl Extensions {
    /// Validate and collect an ordered extension list.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn new<I, S>(extensions: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.into();
            if ext.len() > MAX_EXT_LEN {
                return Err(PathError::BufferTooLarge {
                    len: ext.len(),
                    max: MAX_EXT_LEN,
                });
            }
            if !is_valid_extension(&ext) {
                return Err(PathError::InvalidExtension);
            }
            if !list.contains(&ext) {
                list.push(ext);
            }
        }
        Ok(Self(list))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

/// How a file resolution matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    /// The manifest name is the file name
    Exact,
    /// The manifest name plus this extension is the file name
    Extension(String),
}

/// Outcome of resolving one manifest name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Directory(ProjectPath),
    File { path: ProjectPath, matched: Match },
    /// A symbolic link; never usable as an entry
    Symlink(ProjectPath),
    NotFound(ProjectPath),
    AccessDenied(ProjectPath),
    /// The path exists but is not a file, directory or link
    Error(ProjectPath),
}

impl Resolution {
    /// The path the outcome refers to.
    pub fn path(&self) -> &ProjectPath {
        match self {
            Self::Directory(path)
            | Self::File { path, .. }
            | Self::Symlink(path)
            | Self::NotFound(path)
            | Self::AccessDenied(path)
            | Self::Error(path) => path,
        }
    }
}

/// Resolves manifest names against their declaring directory.
#[derive(Debug, Clone, Default)]
pub struct EntryResolver {
    extensions: Extensions,
}

impl EntryResolver {
    pub fn new(extensions: Extensions) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Resolve `name` declared by the manifest in `dir`.
    ///
    /// An exact match wins over any extension guess. Otherwise each
    /// configured extension is appended in order and the first regular file
    /// found is used.
    ///
    /// # Errors
    ///
    /// Returns the [`PathError`] if a candidate path cannot be built.
    pub fn resolve(&self, dir: &ProjectPath, name: &str) -> Result<Resolution, PathError> {
        let joined = dir.join(name)?;
        if let Some(blocked) = check_parents(dir, name, &joined)? {
            return Ok(blocked);
        }

        match fs::symlink_metadata(joined.to_native()) {
            Ok(meta) => {
                let file_type = meta.file_type();
                let resolution = if file_type.is_symlink() {
                    Resolution::Symlink(joined)
                } else if file_type.is_dir() {
                    Resolution::Directory(joined)
                } else if file_type.is_file() {
                    Resolution::File {
                        path: joined,
                        matched: Match::Exact,
                    }
                } else {
                    Resolution::Error(joined)
                };
                return Ok(resolution);
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Ok(Resolution::AccessDenied(joined));
            }
            Err(e) => {
                tracing::trace!(path = %joined, error = %e, "No exact match, probing extensions");
            }
        }

        for ext in self.extensions.iter() {
            let candidate = joined.with_extension(ext)?;
            match fs::symlink_metadata(candidate.to_native()) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    return Ok(Resolution::Symlink(candidate));
                }
                Ok(meta) if meta.file_type().is_file() => {
                    return Ok(Resolution::File {
                        path: candidate,
                        matched: Match::Extension(ext.to_string()),
                    });
                }
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    return Ok(Resolution::AccessDenied(candidate));
                }
                Err(_) => continue,
            }
        }

        Ok(Resolution::NotFound(joined))
    }
}

/// Inspect each directory between `dir` and the final component of `name`.
///
/// The OS follows links in the middle of a path, so every intermediate
/// component is checked without following it. Returns the outcome that stops
/// resolution, or `None` when every parent is a real directory.
fn check_parents(
    dir: &ProjectPath,
    name: &str,
    joined: &ProjectPath,
) -> Result<Option<Resolution>, PathError> {
    let Some((parents, _)) = name.trim_end_matches('/').rsplit_once('/') else {
        return Ok(None);
    };

    let mut current = dir.clone();
    for component in parents.split('/').filter(|c| !c.is_empty()) {
        current = current.join(component)?;
        match fs::symlink_metadata(current.to_native()) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Ok(Some(Resolution::Symlink(current)));
            }
            Ok(meta) if meta.file_type().is_dir() => {}
            Ok(_) => return Ok(Some(Resolution::NotFound(joined.clone()))),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Ok(Some(Resolution::AccessDenied(current)));
            }
            Err(_) => return Ok(Some(Resolution::NotFound(joined.clone()))),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusion_filter() {
        assert!(is_included("chapter1.md"));
        assert!(is_included("part 2"));
        assert!(!is_included(""));
        assert!(!is_included(".index"));
        assert!(!is_included(".hidden"));
        assert!(!is_included("_notes.md"));
        assert!(!is_included("_Draft_"));
    }

    #[test]
    fn nested_inclusion_filter() {
        assert!(is_included_entry("part/scene.md"));
        assert!(is_included_entry("part/"));
        assert!(is_included_entry("part//scene.md"));
        assert!(!is_included_entry("part/_ignored.md"));
        assert!(!is_included_entry("part/.hidden"));
        assert!(!is_included_entry("_drafts/scene.md"));
        assert!(!is_included_entry("part/./scene.md"));
        assert!(!is_included_entry("/"));
        assert!(!is_included_entry(""));
    }

    #[test]
    fn extensions_keep_order_and_drop_duplicates() {
        let exts = Extensions::new([".txt", ".md", ".txt"]).unwrap();
        assert_eq!(exts.iter().collect::<Vec<_>>(), vec![".txt", ".md"]);
    }

    #[test]
    fn extensions_reject_malformed() {
        assert_eq!(Extensions::new(["md"]), Err(PathError::InvalidExtension));
        assert!(matches!(
            Extensions::new([".abcdefghijklmnop"]),
            Err(PathError::BufferTooLarge { .. })
        ));
    }

    #[test]
    fn default_extensions_are_markdown_then_text() {
        let exts = Extensions::default();
        assert_eq!(exts.iter().collect::<Vec<_>>(), vec![".md", ".txt"]);
    }
}
