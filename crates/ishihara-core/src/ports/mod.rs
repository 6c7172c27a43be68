//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod digit_classifier;
mod plate_source;

pub use digit_classifier::{DigitClassifier, DigitPrediction};
pub use plate_source::PlateSource;
