//! Models command - manage the digit model file.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use ishihara_adapters::models::{fetch_model, find_model, list_models, DIGIT_MODEL};
use ishihara_core::inference::{device_label, get_device};

use super::{ExitCode, Settings};
use crate::output::DownloadProgress;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download the digit model
    Fetch(FetchArgs),
    /// List known models and whether they are installed
    List,
    /// Print model directory path
    Path,
}

/// Arguments for `models fetch`
#[derive(Args)]
pub struct FetchArgs {
    /// URL of the safetensors file
    #[arg(long)]
    pub url: String,

    /// Expected SHA-256 of the file (hex)
    #[arg(long, value_name = "HEX", value_parser = parse_sha256)]
    pub sha256: Option<String>,

    /// Model to install
    #[arg(long, default_value = DIGIT_MODEL)]
    pub model: String,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse and validate a hex SHA-256 digest.
fn parse_sha256(s: &str) -> Result<String, String> {
    if s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(s.to_ascii_lowercase())
    } else {
        Err(format!("'{s}' is not a 64-character hex SHA-256"))
    }
}

/// Run the models command.
pub fn run(args: &ModelsArgs, settings: &Settings) -> Result<ExitCode> {
    match &args.command {
        ModelsCommand::Fetch(fetch) => fetch_models(fetch, settings),
        ModelsCommand::List => list(settings),
        ModelsCommand::Path => {
            println!("{}", settings.models_dir.display());
            Ok(ExitCode::Success)
        }
    }
}

fn fetch_models(args: &FetchArgs, settings: &Settings) -> Result<ExitCode> {
    let model = find_model(&args.model)
        .with_context(|| format!("Unknown model '{}'", args.model))?;

    let progress = DownloadProgress::new(model.name, args.quiet);
    let path = fetch_model(
        &settings.models_dir,
        model,
        &args.url,
        args.sha256.as_deref(),
        |done, total| progress.update(done, total),
    )?;
    progress.finish("done");

    println!("{}", path.display());
    Ok(ExitCode::Success)
}

#[allow(clippy::unnecessary_wraps)]
fn list(settings: &Settings) -> Result<ExitCode> {
    let models = list_models(&settings.models_dir);

    println!("Models directory: {}", settings.models_dir.display());
    println!("Inference device: {}", device_label(&get_device()));
    println!();

    for status in &models {
        let mark = if status.installed { "✓" } else { "✗" };
        println!(
            "  {mark} {} ({}) - {}",
            status.info.name, status.info.filename, status.info.description
        );
    }

    println!();
    let installed = models.iter().filter(|m| m.installed).count();
    println!("{}/{} models installed", installed, models.len());

    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sha256() {
        let hex = "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824";
        assert_eq!(parse_sha256(hex), Ok(hex.to_ascii_lowercase()));
        assert!(parse_sha256("abc").is_err());
        assert!(parse_sha256(&"z".repeat(64)).is_err());
    }
}
