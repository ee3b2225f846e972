//! Filesystem layer for Colette
//!
//! Provides bounds-checked path construction, manifest entry resolution and
//! the project settings file. Every other crate builds paths through here.

pub mod config;
pub mod constants;
pub mod error;
pub mod path;
pub mod resolve;

pub use config::Settings;
pub use constants::ProjectFile;
pub use error::{Error, PathError, Result};
pub use path::{ProjectPath, basename, join_extension, join_path};
pub use resolve::{EntryResolver, Extensions, Match, Resolution, is_included, is_included_entry};
