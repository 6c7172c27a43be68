//! Evaluate command - score responses and diagnose.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use ishihara_core::ResponseRecord;
use serde::Deserialize;

use super::{ExitCode, Settings};

/// Arguments for the evaluate command
#[derive(Args)]
pub struct EvaluateArgs {
    /// JSON file with `{"responses": [...]}`; reads stdin when omitted or `-`
    pub input: Option<PathBuf>,
}

/// Request body accepted by `evaluate`.
#[derive(Debug, Deserialize)]
struct EvaluateRequest {
    #[serde(default)]
    responses: Vec<ResponseInput>,
}

#[derive(Debug, Deserialize)]
struct ResponseInput {
    filename: String,
    user_answer: i64,
}

impl From<ResponseInput> for ResponseRecord {
    fn from(input: ResponseInput) -> Self {
        // Answers that do not fit a digit can never be correct.
        let answer = u8::try_from(input.user_answer).unwrap_or(u8::MAX);
        Self::new(input.filename, answer)
    }
}

/// Run the evaluate command.
pub fn run(args: &EvaluateArgs, settings: &Settings) -> Result<ExitCode> {
    let raw = read_input(args.input.as_deref())?;
    let responses = parse_request(&raw)?;

    let evaluation = settings.evaluator().evaluate(&responses)?;
    settings.output().write(&evaluation)?;

    if evaluation.diagnosis.is_normal() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::Flagged)
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read responses from stdin")?;
            Ok(raw)
        }
    }
}

fn parse_request(raw: &str) -> Result<Vec<ResponseRecord>> {
    let request: EvaluateRequest =
        serde_json::from_str(raw).context("Invalid evaluate request JSON")?;
    Ok(request.responses.into_iter().map(Into::into).collect())
}
