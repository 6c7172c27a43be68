//! Candle-backed digit classifier.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::Device;
use tracing::debug;

use super::{IshiharaDigitNet, LazyModel};
use crate::ports::{DigitClassifier, DigitPrediction};

/// Digit classifier running [`IshiharaDigitNet`] on local weights.
///
/// Weights are loaded on the first classification, not at construction,
/// so building one is cheap even when the model file is absent.
pub struct CandleDigitClassifier {
    model: LazyModel<IshiharaDigitNet>,
}

impl CandleDigitClassifier {
    /// Creates a classifier for the weights at `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>, device: Device) -> Self {
        Self {
            model: LazyModel::new(path, device, IshiharaDigitNet::new),
        }
    }

    /// Path of the weights file.
    #[must_use]
    pub fn model_path(&self) -> &Path {
        self.model.path()
    }
}

impl DigitClassifier for CandleDigitClassifier {
    fn classify(&self, image: &[u8]) -> Result<DigitPrediction> {
        let net = self.model.get().context("Digit model is not available")?;

        let decoded = image::load_from_memory(image).context("Failed to decode plate image")?;
        let probabilities = net.predict(&decoded)?;
        let prediction = DigitPrediction::from_probabilities(probabilities);

        debug!(
            "Classified plate as {} ({:.3})",
            prediction.digit, prediction.confidence
        );
        Ok(prediction)
    }
}
