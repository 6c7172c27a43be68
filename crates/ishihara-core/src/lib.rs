//! Ishihara Core - domain types and test engine
//!
//! This crate holds the plate catalog, session builder, response evaluator
//! and diagnosis rules of the Ishihara colour-vision test, plus the Candle
//! digit classifier used as ground truth. Plate storage and the classifier
//! are reached through the traits in [`ports`].

pub mod domain;
pub mod engine;
pub mod error;
pub mod inference;
pub mod ports;

pub use domain::{
    CategoryReport, CategoryStatistic, CategoryStats, Confidence, DeficiencyFamily, DeficiencyType,
    DetailedResult, Diagnosis, DiagnosisStatus, Evaluation, PlateCategory, PlateMetadata,
    ResponseRecord, SessionPlate, Severity, TestSession,
};
pub use engine::{diagnose, PlateCatalog, ResponseEvaluator, SessionBuilder};
pub use error::{EngineError, EngineResult};
pub use ports::{DigitClassifier, DigitPrediction, PlateSource};
