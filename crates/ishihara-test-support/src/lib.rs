//! Test support utilities for the Ishihara engine.
//!
//! Provides mock ports, plate name builders, synthetic plate images and
//! untrained digit model weights.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ishihara_core::{PlateCatalog, ResponseEvaluator, ResponseRecord};
//! use ishihara_test_support::{MockDigitClassifier, MockPlateSource, PlateNameBuilder};
//!
//! let name = PlateNameBuilder::new(3).build();
//! let source = MockPlateSource::with_synthetic([name.clone()]);
//! let evaluator = ResponseEvaluator::new(
//!     PlateCatalog::new(Arc::new(source)),
//!     Arc::new(MockDigitClassifier::reading_marker()),
//! );
//!
//! let result = evaluator.evaluate(&[ResponseRecord::new(name, 3)]).unwrap();
//! assert_eq!(result.total_correct, 1);
//! ```

mod builders;
mod mocks;
mod models;

pub use builders::{read_marker, PlateNameBuilder, SyntheticPlateBuilder, MARKER_STEP};
pub use mocks::{MockDigitClassifier, MockPlateSource};
pub use models::write_untrained_digit_model;
