//! Subcommand handlers

pub mod config;
pub mod manifest;
pub mod scan;

use std::io::IsTerminal;
use std::path::Path;

use crate::error::CliError;

/// Reject `-` (stdin) when standard input is an interactive terminal.
///
/// This is a usage error and must be reported before the scan pipeline
/// is entered.
pub(crate) fn ensure_piped_stdin(path: &Path) -> Result<(), CliError> {
    if path == Path::new("-") && std::io::stdin().is_terminal() {
        return Err(CliError::Usage(
            "standard input is a terminal; pipe data into hullscan or pass a file path"
                .to_owned(),
        ));
    }
    Ok(())
}
