//! Classify command - run the digit model on one plate.

use anyhow::Result;
use clap::Args;
use ishihara_core::DigitPrediction;
use serde::Serialize;

use super::{ExitCode, Settings};

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Plate filename as listed in a session
    pub filename: String,
}

/// Classifier output for one plate.
#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    /// Plate filename.
    pub filename: String,
    /// Most probable digit.
    pub predicted_digit: u8,
    /// Probability of the predicted digit, in percent with two decimals.
    pub confidence: f64,
    /// Probability of each digit 0-9.
    pub probabilities: [f32; 10],
}

impl ClassifyReport {
    fn new(filename: String, prediction: &DigitPrediction) -> Self {
        Self {
            filename,
            predicted_digit: prediction.digit,
            confidence: (f64::from(prediction.confidence) * 10_000.0).round() / 100.0,
            probabilities: prediction.probabilities,
        }
    }
}

/// Run the classify command.
pub fn run(args: &ClassifyArgs, settings: &Settings) -> Result<ExitCode> {
    let prediction = settings.evaluator().classify_plate(&args.filename)?;
    let report = ClassifyReport::new(args.filename.clone(), &prediction);
    settings.output().write(&report)?;
    Ok(ExitCode::Success)
}
