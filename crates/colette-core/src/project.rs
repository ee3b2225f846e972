//! Run orchestration
//!
//! Connects a [`ProjectConfig`] to a [`Traversal`] and the [`ModeHandler`]
//! for its mode. The root manifest is opened before any output is touched,
//! so a project without one leaves no half-created document behind.

use colette_fs::ProjectPath;

use crate::Result;
use crate::config::{Mode, ProjectConfig};
use crate::modes::ModeHandler;
use crate::traversal::Traversal;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: Mode,
    /// Number of files handed to the mode handler
    pub files: usize,
    /// The collated document or list directory
    pub output: Option<ProjectPath>,
}

/// Walk the project described by `config` and process every file in
/// manifest order.
///
/// # Errors
///
/// The first structural or handler failure ends the run and is returned as
/// [`crate::Error::Diagnostic`].
pub fn traverse_and_process(config: &ProjectConfig) -> Result<RunSummary> {
    tracing::debug!(root = %config.root, mode = %config.mode, "Starting run");

    let mut traversal = Traversal::start(&config.root, config.resolver(), config.max_depth)?;
    let mut handler = ModeHandler::open(config)?;

    let mut files = 0;
    while let Some(entry) = traversal.next_entry()? {
        handler.handle(&entry)?;
        files += 1;
    }
    let output = handler.finish()?;

    tracing::debug!(files, "Run finished");
    Ok(RunSummary {
        mode: config.mode,
        files,
        output,
    })
}
