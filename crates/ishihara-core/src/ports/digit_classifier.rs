//! Digit classifier port used as the ground-truth oracle.

use serde::{Deserialize, Serialize};

/// Prediction for a single plate image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitPrediction {
    /// Most likely digit (0-9).
    pub digit: u8,
    /// Probability of `digit` (0.0 to 1.0).
    pub confidence: f32,
    /// Probability of each digit, indexed by digit.
    pub probabilities: [f32; 10],
}

impl DigitPrediction {
    /// Builds a prediction from a probability vector, picking the arg-max.
    ///
    /// Ties resolve to the lowest digit.
    #[must_use]
    pub fn from_probabilities(probabilities: [f32; 10]) -> Self {
        let (digit, confidence) = probabilities.iter().copied().enumerate().fold(
            (0usize, f32::NEG_INFINITY),
            |best, (i, p)| if p > best.1 { (i, p) } else { best },
        );

        #[allow(clippy::cast_possible_truncation)]
        let digit = digit as u8;

        Self {
            digit,
            confidence,
            probabilities,
        }
    }
}

/// Port for recognizing the digit drawn on a plate.
///
/// Implementations must be deterministic for identical input bytes.
pub trait DigitClassifier: Send + Sync {
    /// Classifies the encoded plate image.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unavailable, the image cannot be
    /// decoded, or inference fails.
    fn classify(&self, image: &[u8]) -> anyhow::Result<DigitPrediction>;
}
