//! Plates command - list the catalog.

use anyhow::Result;

use super::{ExitCode, Settings};

/// Run the plates command.
pub fn run(settings: &Settings) -> Result<ExitCode> {
    let plates = settings.catalog().list_plates()?;
    settings.output().write(&plates)?;
    Ok(ExitCode::Success)
}
