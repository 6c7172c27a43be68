//! Digit model weight fixtures.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use ishihara_core::inference::IshiharaDigitNet;

/// Writes freshly initialised [`IshiharaDigitNet`] weights to `path`.
///
/// The network is untrained, so its answers are arbitrary but stable for
/// a given weights file and image.
///
/// # Errors
///
/// Returns an error if the network cannot be built or the file written.
pub fn write_untrained_digit_model(path: &Path) -> Result<()> {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    IshiharaDigitNet::new(vb)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    varmap
        .save(path)
        .with_context(|| format!("Failed to write weights to {}", path.display()))
}
