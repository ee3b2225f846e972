//! Shared test utilities for the colette workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`] - [`TestProject`] builder for writing-project trees

pub mod project;

pub use project::TestProject;
