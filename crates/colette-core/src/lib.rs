//! Core engine for Colette
//!
//! A Colette project is a tree of text fragments. Every directory carries a
//! `.index` manifest naming, in order, the files and subdirectories that
//! belong to the document. This crate walks that tree and feeds each file to
//! an output mode, and keeps manifests in step with the directories.
//!
//! # Modules
//!
//! - [`config`] - Validated run configuration
//! - [`manifest`] - Manifest line format
//! - [`traversal`] - Depth-first walk driven by an explicit stack of manifests
//! - [`maintenance`] - Breadth-first manifest synchronisation (`init`)
//! - [`modes`] - Check, collate and list handlers
//! - [`project`] - Wires configuration, traversal and handlers together
//! - [`report`] - Diagnostic composition
//! - [`render`] - Probe for the external document renderer

pub mod config;
pub mod error;
pub mod maintenance;
pub mod manifest;
pub mod modes;
pub mod project;
pub mod render;
pub mod report;
pub mod traversal;

pub use config::{Mode, Padding, ProjectConfig, Title};
pub use error::{Error, Result};
pub use maintenance::{MaintenanceReport, run_maintenance};
pub use modes::ModeHandler;
pub use project::{RunSummary, traverse_and_process};
pub use render::pandoc_available;
pub use report::{Detail, Diagnostic, Operation};
pub use traversal::{EntryKind, ResolvedEntry, Traversal};
