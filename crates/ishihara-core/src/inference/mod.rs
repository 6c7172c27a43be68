//! Digit inference using Candle.
//!
//! Provides weight loading, device selection and the CNN that reads the
//! digit hidden in a plate.

mod classifier;
mod device;
mod digit_net;
mod loader;

pub use classifier::CandleDigitClassifier;
pub use device::{device_label, get_device};
pub use digit_net::{IshiharaDigitNet, INPUT_SIZE, NUM_CLASSES};
pub use loader::{load_safetensors, LazyModel, ModelBuilder};
