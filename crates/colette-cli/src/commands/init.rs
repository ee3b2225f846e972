//! Manifest maintenance command

use std::path::Path;

use colored::Colorize;

use colette_core::run_maintenance;

use super::project_root;
use crate::error::{CliError, Result};

/// Run the init command
///
/// Every failed directory is reported; the command fails if any did.
pub fn run_init(dir: &Path) -> Result<()> {
    let root = project_root(dir)?;
    println!("{} Updating manifests in {}", "=>".blue().bold(), root);

    let report = run_maintenance(&root);

    for failure in &report.failures {
        eprintln!("   {} {}", "x".red().bold(), failure);
    }

    if !report.is_success() {
        return Err(CliError::user(format!(
            "{} of {} directories could not be updated",
            report.error_count(),
            report.directories
        )));
    }

    println!(
        "{} {} directories scanned, {} entries added",
        "OK".green().bold(),
        report.directories,
        report.entries_added
    );
    Ok(())
}
