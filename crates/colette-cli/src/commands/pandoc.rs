//! Renderer availability command

use colored::Colorize;

use colette_core::render::{PANDOC, pandoc_available};

use crate::error::{CliError, Result};

/// Run the check-pandoc command
pub fn run_check_pandoc() -> Result<()> {
    if pandoc_available() {
        println!("{} {} is available", "OK".green().bold(), PANDOC);
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} was not found; install it to render collated documents",
            PANDOC
        )))
    }
}
