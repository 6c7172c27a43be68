//! Core domain types for the Ishihara colour-vision test.

mod diagnosis;
mod plate;
mod response;
mod session;

pub use diagnosis::{Confidence, DeficiencyType, Diagnosis, DiagnosisStatus, Severity};
pub use plate::{DeficiencyFamily, PlateCategory, PlateMetadata};
pub use response::{
    round1, CategoryReport, CategoryStatistic, CategoryStats, DetailedResult, Evaluation,
    ResponseRecord,
};
pub use session::{SessionPlate, TestSession};
