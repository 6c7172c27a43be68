//! Image command - fetch the bytes of a plate.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::{ExitCode, Settings};

/// Arguments for the image command
#[derive(Args)]
pub struct ImageArgs {
    /// Plate filename as listed in a session
    pub filename: String,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Run the image command.
pub fn run(args: &ImageArgs, settings: &Settings) -> Result<ExitCode> {
    let bytes = settings.catalog().read_plate(&args.filename)?;

    if let Some(path) = &args.output {
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} bytes to {}", bytes.len(), path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes).context("Failed to write image to stdout")?;
        stdout.flush()?;
    }

    Ok(ExitCode::Success)
}
