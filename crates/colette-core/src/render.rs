//! External renderer probe
//!
//! Colette only produces the collated source; turning it into a finished
//! document is left to pandoc. The probe lets callers report early when it
//! is missing.

use std::process::{Command, Stdio};

/// Executable probed by [`pandoc_available`].
pub const PANDOC: &str = "pandoc";

/// Whether `pandoc --version` runs successfully.
pub fn pandoc_available() -> bool {
    let status = Command::new(PANDOC)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!(error = %e, "{} not runnable", PANDOC);
            false
        }
    }
}
