//! Start command - draw a new test session.

use anyhow::Result;
use clap::Args;

use super::{ExitCode, Settings};

/// Arguments for the start command
#[derive(Args)]
pub struct StartArgs {
    /// Number of plates (clamped to 15-30; default 20 or `session.default_count`)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub count: Option<i64>,
}

/// Run the start command.
pub fn run(args: &StartArgs, settings: &Settings) -> Result<ExitCode> {
    let session = settings.session_builder().start_session(args.count)?;
    settings.output().write(&session)?;
    Ok(ExitCode::Success)
}
