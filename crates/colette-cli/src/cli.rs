//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colette_core::{Padding, Title};

/// Colette - assemble a manuscript from manifest-ordered text fragments
#[derive(Parser, Debug)]
#[command(name = "colette")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Content extension to probe, in order (repeatable; replaces the configured list)
    #[arg(short = 'e', long = "extension", value_name = "EXT", global = true)]
    pub extensions: Vec<String>,

    /// Maximum manifest nesting depth
    #[arg(long, value_name = "N", global = true)]
    pub max_depth: Option<usize>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create or update the .index manifest of every directory
    ///
    /// Names found on disk but missing from a manifest are appended in
    /// sorted order. Existing lines are never reordered or removed.
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Verify that every file named by the manifests can be read
    Check {
        /// Project directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Concatenate every file, in manifest order, into _<title>_.md
    Collate {
        /// Project directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Document title used to name the output
        #[arg(short, long)]
        title: Option<Title>,
    },

    /// Write numbered links to every file, in manifest order, into _<title>_/
    List {
        /// Project directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Document title used to name the output
        #[arg(short, long)]
        title: Option<Title>,

        /// Digits used for link positions (1-10)
        #[arg(short, long)]
        padding: Option<Padding>,
    },

    /// Report whether pandoc is available for rendering
    CheckPandoc,

    /// Generate shell completions
    ///
    /// Examples:
    ///   colette completions bash > ~/.local/share/bash-completion/completions/colette
    ///   colette completions zsh > ~/.zfunc/_colette
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
