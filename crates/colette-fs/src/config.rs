//! Project settings file
//!
//! An optional `.colette.toml` at the project root supplies defaults for the
//! values the command line can also set. Values are only parsed here; range
//! and format checks happen where the values are used.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::{Error, ProjectFile, ProjectPath, Result};

/// Contents of `.colette.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Title used to name generated outputs
    pub title: Option<String>,
    /// Zero-padding width of list positions
    pub padding: Option<u32>,
    /// Ordered content extensions probed during resolution
    pub extensions: Option<Vec<String>>,
    /// Maximum manifest nesting depth
    pub max_depth: Option<usize>,
}

impl Settings {
    /// Load the settings file from `root`.
    ///
    /// A missing file yields the empty settings.
    pub fn load(root: &ProjectPath) -> Result<Self> {
        let path = root.join(ProjectFile::Settings.as_str())?.to_native();
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(?path, "Loading project settings");
                Self::parse(&path, &content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Parse settings text; `path` is only used for error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::SettingsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
