//! Ishihara digit recognition network.
//!
//! A VGG-style CNN trained to read the digit hidden in an Ishihara plate.
//! Used as the ground-truth oracle when scoring answers.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use candle_core::{Device, Module, ModuleT, Tensor, D};
use candle_nn::{batch_norm, conv2d, linear, BatchNorm, Conv2d, Conv2dConfig, Linear, VarBuilder};

/// Input width and height in pixels.
pub const INPUT_SIZE: usize = 128;

/// Number of output classes (digits 0-9).
pub const NUM_CLASSES: usize = 10;

/// Output channels of the four convolutional blocks.
const BLOCK_CHANNELS: [usize; 4] = [32, 64, 128, 256];

/// Batch norm epsilon used during training.
const BN_EPS: f64 = 1e-3;

/// Two 3x3 convolutions, each followed by ReLU and batch norm, then a 2x2 max pool.
struct ConvBlock {
    conv_a: Conv2d,
    bn_a: BatchNorm,
    conv_b: Conv2d,
    bn_b: BatchNorm,
}

impl ConvBlock {
    fn new(in_channels: usize, out_channels: usize, vb: &VarBuilder) -> Result<Self> {
        let cfg = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        Ok(Self {
            conv_a: conv2d(in_channels, out_channels, 3, cfg, vb.pp("conv_a"))?,
            bn_a: batch_norm(out_channels, BN_EPS, vb.pp("bn_a"))?,
            conv_b: conv2d(out_channels, out_channels, 3, cfg, vb.pp("conv_b"))?,
            bn_b: batch_norm(out_channels, BN_EPS, vb.pp("bn_b"))?,
        })
    }
}

impl Module for ConvBlock {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.conv_a.forward(x)?.relu()?;
        let x = self.bn_a.forward_t(&x, false)?;
        let x = self.conv_b.forward(&x)?.relu()?;
        let x = self.bn_b.forward_t(&x, false)?;
        x.max_pool2d(2)
    }
}

/// Ishihara digit classifier network.
///
/// Architecture: 4 conv blocks (32, 64, 128, 256 channels), then
/// dense 512 + BN, dense 256 + BN, dense 10.
/// Input: `(1, 3, 128, 128)` RGB in `[0, 1]`.
/// Output: logits for digits 0-9.
///
/// The first dense layer expects channel-major flattening (`C, H, W`), so
/// weights exported from a channels-last framework must be permuted.
pub struct IshiharaDigitNet {
    blocks: Vec<ConvBlock>,
    fc1: Linear,
    bn_fc1: BatchNorm,
    fc2: Linear,
    bn_fc2: BatchNorm,
    head: Linear,
    device: Device,
}

impl IshiharaDigitNet {
    /// Creates the network from weights.
    ///
    /// # Errors
    ///
    /// Returns an error if model weights are missing or have the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();

        let mut blocks = Vec::with_capacity(BLOCK_CHANNELS.len());
        let mut in_channels = 3;
        for (i, &out_channels) in BLOCK_CHANNELS.iter().enumerate() {
            blocks.push(
                ConvBlock::new(in_channels, out_channels, &vb.pp(format!("block{}", i + 1)))
                    .with_context(|| format!("Failed to build conv block {}", i + 1))?,
            );
            in_channels = out_channels;
        }

        // 128 -> 64 -> 32 -> 16 -> 8 after four pools
        let side = INPUT_SIZE >> BLOCK_CHANNELS.len();
        let flat = in_channels * side * side;

        Ok(Self {
            blocks,
            fc1: linear(flat, 512, vb.pp("fc1"))?,
            bn_fc1: batch_norm(512, BN_EPS, vb.pp("bn_fc1"))?,
            fc2: linear(512, 256, vb.pp("fc2"))?,
            bn_fc2: batch_norm(256, BN_EPS, vb.pp("bn_fc2"))?,
            head: linear(256, NUM_CLASSES, vb.pp("head"))?,
            device,
        })
    }

    /// Converts a decoded plate to the network input.
    ///
    /// # Returns
    /// Tensor of shape `(1, 3, 128, 128)` normalized to `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn preprocess(&self, image: &image::DynamicImage) -> Result<Tensor> {
        let resized = image.resize_exact(
            INPUT_SIZE as u32,
            INPUT_SIZE as u32,
            image::imageops::FilterType::CatmullRom,
        );
        let rgb = resized.to_rgb8();

        let data: Vec<f32> = rgb.into_raw().into_iter().map(|v| f32::from(v) / 255.0).collect();

        Tensor::from_vec(data, (INPUT_SIZE, INPUT_SIZE, 3), &self.device)
            .and_then(|t| t.permute((2, 0, 1)))
            .and_then(|t| t.unsqueeze(0))
            .context("Failed to create plate tensor")
    }

    /// Returns per-digit probabilities for a decoded plate.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    pub fn predict(&self, image: &image::DynamicImage) -> Result<[f32; NUM_CLASSES]> {
        let input = self.preprocess(image)?;
        let logits = self.forward(&input).context("Digit inference failed")?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()?;

        probs
            .try_into()
            .map_err(|v: Vec<f32>| anyhow::anyhow!("Expected {NUM_CLASSES} outputs, got {}", v.len()))
    }
}

impl Module for IshiharaDigitNet {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let mut x = x.clone();
        for block in &self.blocks {
            x = block.forward(&x)?;
        }

        let x = x.flatten_from(1)?;

        let x = self.fc1.forward(&x)?.relu()?;
        let x = self.bn_fc1.forward_t(&x, false)?;

        let x = self.fc2.forward(&x)?.relu()?;
        let x = self.bn_fc2.forward_t(&x, false)?;

        self.head.forward(&x)
    }
}
