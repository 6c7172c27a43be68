//! Safetensors weight loading and deferred model construction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use once_cell::sync::OnceCell;
use safetensors::SafeTensors;
use tracing::debug;

/// Constructor turning loaded weights into a model.
pub type ModelBuilder<T> = fn(VarBuilder) -> Result<T>;

/// A model whose weights are read on first use.
///
/// Concurrent first callers race on a single initialization; exactly one
/// load happens and every caller sees the same instance. A failed load is
/// not cached, so a later call retries (for example after `models fetch`).
pub struct LazyModel<T> {
    path: PathBuf,
    device: Device,
    builder: ModelBuilder<T>,
    model: OnceCell<T>,
}

impl<T: Send + Sync> LazyModel<T> {
    /// Creates a loader for the weights at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl AsRef<Path>, device: Device, builder: ModelBuilder<T>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            device,
            builder,
            model: OnceCell::new(),
        }
    }

    /// Returns the model, loading it on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights file is missing or malformed, or if
    /// the builder rejects the tensors it contains.
    pub fn get(&self) -> Result<&T> {
        self.model.get_or_try_init(|| {
            debug!("Loading model weights from {}", self.path.display());
            let vb = load_safetensors(&self.path, &self.device)?;
            (self.builder)(vb)
                .with_context(|| format!("Invalid model weights: {}", self.path.display()))
        })
    }

    /// Path of the weights file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once the model has been loaded successfully.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }
}

/// Reads a safetensors file into a `VarBuilder` on `device`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid safetensors.
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;

    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))?;

    let mut tensor_map = HashMap::new();
    for (name, view) in tensors.tensors() {
        let dtype = candle_dtype(view.dtype())?;
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, &view.shape().to_vec(), device)
            .with_context(|| format!("Failed to create tensor '{name}'"))?;
        tensor_map.insert(name, tensor);
    }

    debug!("Loaded {} tensors from {}", tensor_map.len(), path.display());
    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

fn candle_dtype(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        S::I64 => Ok(DType::I64),
        S::U8 => Ok(DType::U8),
        S::U32 => Ok(DType::U32),
        other => anyhow::bail!("Unsupported tensor dtype: {other:?}"),
    }
}
