//! Colette CLI
//!
//! Builds a manuscript from a tree of text fragments ordered by `.index`
//! manifests.

mod cli;
mod commands;
mod error;
mod logging;

use std::io;

use clap::{CommandFactory, Parser};
use colette_core::Mode;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::Overrides;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to set up logging: {}", e)))?;
    tracing::debug!("Verbose mode enabled");

    let overrides = Overrides {
        extensions: cli.extensions,
        max_depth: cli.max_depth,
        ..Overrides::default()
    };

    match cli.command {
        Some(cmd) => execute_command(cmd, overrides),
        None => {
            println!("{} Manuscript assembly from ordered fragments", "colette".green().bold());
            println!();
            println!("Run {} for available commands.", "colette --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, overrides: Overrides) -> Result<()> {
    match cmd {
        Commands::Init { dir } => commands::run_init(&dir),
        Commands::Check { dir } => commands::run_process(&dir, Mode::Check, overrides),
        Commands::Collate { dir, title } => {
            let overrides = Overrides { title, ..overrides };
            commands::run_process(&dir, Mode::Collate, overrides)
        }
        Commands::List {
            dir,
            title,
            padding,
        } => {
            let overrides = Overrides {
                title,
                padding,
                ..overrides
            };
            commands::run_process(&dir, Mode::List, overrides)
        }
        Commands::CheckPandoc => commands::run_check_pandoc(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "colette", &mut io::stdout());
            Ok(())
        }
    }
}
