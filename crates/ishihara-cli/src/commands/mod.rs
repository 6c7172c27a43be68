//! CLI command definitions and handlers.

pub mod classify;
pub mod evaluate;
pub mod image;
pub mod models;
pub mod plates;
pub mod start;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use ishihara_adapters::{default_models_dir, model_path, FsPlateSource, DIGIT_MODEL};
use ishihara_core::inference::{get_device, CandleDigitClassifier};
use ishihara_core::{DigitClassifier, PlateCatalog, ResponseEvaluator, SessionBuilder};
use tracing::debug;

use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Plate directory used when neither flag nor config names one.
pub const DEFAULT_PLATES_DIR: &str = "plates";

/// Ishihara - colour-vision test engine
#[derive(Parser)]
#[command(name = "ishihara")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Clone, Default)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the plate images (overrides config)
    #[arg(long, value_name = "DIR", global = true)]
    pub plates_dir: Option<PathBuf>,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Start a new test session with randomly drawn plates
    Start(start::StartArgs),
    /// Write the image bytes of a plate
    Image(image::ImageArgs),
    /// Classify the digit shown on a plate
    Classify(classify::ClassifyArgs),
    /// Score a batch of responses and print the diagnosis
    Evaluate(evaluate::EvaluateArgs),
    /// List the plate catalog
    Plates,
    /// Manage the digit model file
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded (normal diagnosis for `evaluate`).
    Success = 0,
    /// `evaluate` produced a non-normal diagnosis.
    Flagged = 1,
    /// Any error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Effective settings after layering config files and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Plate image directory.
    pub plates_dir: PathBuf,
    /// Models directory.
    pub models_dir: PathBuf,
    /// Session size when `--count` is absent.
    pub default_count: Option<usize>,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Settings {
    /// Applies CLI flags over `config`.
    #[must_use]
    pub fn resolve(global: &GlobalArgs, config: AppConfig) -> Self {
        let settings = Self {
            plates_dir: global
                .plates_dir
                .clone()
                .or(config.plates.dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLATES_DIR)),
            models_dir: global
                .models_dir
                .clone()
                .or(config.models.dir)
                .unwrap_or_else(default_models_dir),
            default_count: config.session.default_count,
            pretty: global.pretty || config.output.pretty.unwrap_or(false),
        };
        debug!("Effective settings: {settings:?}");
        settings
    }

    /// Catalog over the configured plate directory.
    #[must_use]
    pub fn catalog(&self) -> PlateCatalog {
        PlateCatalog::new(Arc::new(FsPlateSource::new(&self.plates_dir)))
    }

    /// Session builder honouring the configured default count.
    #[must_use]
    pub fn session_builder(&self) -> SessionBuilder {
        let builder = SessionBuilder::new(self.catalog());
        match self.default_count {
            Some(count) => builder.with_default_count(count),
            None => builder,
        }
    }

    /// Evaluator using the digit model from the models directory.
    ///
    /// The model is loaded on first classification, so this never fails.
    #[must_use]
    pub fn evaluator(&self) -> ResponseEvaluator {
        ResponseEvaluator::new(self.catalog(), self.classifier())
    }

    fn classifier(&self) -> Arc<dyn DigitClassifier> {
        let path = model_path(&self.models_dir, DIGIT_MODEL)
            .unwrap_or_else(|| self.models_dir.join(DIGIT_MODEL));
        Arc::new(CandleDigitClassifier::new(path, get_device()))
    }

    /// JSON writer for stdout.
    #[must_use]
    pub fn output(&self) -> JsonOutput {
        JsonOutput::stdout(self.pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_win_over_config() {
        let config: AppConfig = toml::from_str(
            r"
[plates]
dir = 'from-config'

[output]
pretty = false
",
        )
        .unwrap_or_default();
        let global = GlobalArgs {
            plates_dir: Some(PathBuf::from("from-flag")),
            pretty: true,
            ..GlobalArgs::default()
        };

        let settings = Settings::resolve(&global, config);
        assert_eq!(settings.plates_dir, PathBuf::from("from-flag"));
        assert!(settings.pretty);
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(&GlobalArgs::default(), AppConfig::default());
        assert_eq!(settings.plates_dir, PathBuf::from(DEFAULT_PLATES_DIR));
        assert_eq!(settings.models_dir, default_models_dir());
        assert!(!settings.pretty);
        assert!(settings.default_count.is_none());
    }

    #[test]
    fn test_negative_count_parses() {
        let cli = Cli::try_parse_from(["ishihara", "start", "--count", "-5"]);
        match cli.map(|c| c.command) {
            Ok(Commands::Start(args)) => assert_eq!(args.count, Some(-5)),
            _ => panic!("start --count -5 should parse"),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::Flagged as u8, 1);
        assert_eq!(ExitCode::Error as u8, 2);
    }
}
