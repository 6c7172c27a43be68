//! Test engine: catalog, session building, scoring and diagnosis.

mod catalog;
mod diagnosis;
mod evaluator;
mod session;

pub use catalog::{parse_plate_name, PlateCatalog, PlateIndex};
pub use diagnosis::{diagnose, Likelihoods, THRESHOLD_HIGH, THRESHOLD_LOW, THRESHOLD_MODERATE};
pub use evaluator::ResponseEvaluator;
pub use session::{clamp_count, SessionBuilder, DEFAULT_PLATES, MAX_PLATES, MIN_PLATES};
