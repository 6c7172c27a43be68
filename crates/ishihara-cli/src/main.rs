//! Ishihara CLI - colour-vision test engine.

use clap::Parser;
use ishihara_core::EngineError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode, Settings};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match cli.global.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = Settings::resolve(&cli.global, AppConfig::load());

    let result = match &cli.command {
        Commands::Start(args) => commands::start::run(args, &settings),
        Commands::Image(args) => commands::image::run(args, &settings),
        Commands::Classify(args) => commands::classify::run(args, &settings),
        Commands::Evaluate(args) => commands::evaluate::run(args, &settings),
        Commands::Plates => commands::plates::run(&settings),
        Commands::Models(args) => commands::models::run(args, &settings),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, &settings);
            ExitCode::Error
        }
    };

    exit_code.into()
}

/// Engine errors become a JSON payload on stdout; anything else goes to stderr.
fn report_error(err: &anyhow::Error, settings: &Settings) {
    if let Some(engine) = err.downcast_ref::<EngineError>() {
        tracing::debug!("Engine error: {engine:?}");
        if settings.output().write_error(engine).is_ok() {
            return;
        }
    }
    eprintln!("error: {err:#}");
}
