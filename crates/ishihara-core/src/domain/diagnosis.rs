//! Diagnosis types produced from per-category statistics.

use serde::{Deserialize, Serialize};

/// Overall outcome of a colour-vision test.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStatus {
    /// No deficiency pattern.
    Normal,
    /// Strong deficiency (dichromacy).
    ColourBlind,
    /// Moderate deficiency (anomalous trichromacy).
    ColourWeak,
    /// Mild signs that may indicate a weakness.
    PossibleWeakness,
    /// Errors are significant but do not favour either family.
    Inconclusive,
}

/// Graded severity of the finding.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// No deficiency.
    None,
    /// Mild.
    Mild,
    /// Moderate.
    Moderate,
    /// Strong.
    Strong,
    /// Mixed pattern across families.
    Varied,
}

/// Specific deficiency named by the diagnosis.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeficiencyType {
    /// Green-blindness.
    Deuteranopia,
    /// Green-weakness.
    Deuteranomaly,
    /// Red-blindness.
    Protanopia,
    /// Red-weakness.
    Protanomaly,
}

/// How much weight the diagnosis deserves.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// High confidence.
    High,
    /// Moderate confidence.
    Moderate,
    /// Low confidence.
    Low,
}

/// Structured colour-vision diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Overall status.
    pub status: DiagnosisStatus,
    /// Severity grade.
    pub severity: Severity,
    /// Named deficiency, if any.
    #[serde(rename = "type")]
    pub deficiency_type: Option<DeficiencyType>,
    /// Confidence label.
    pub confidence: Confidence,
    /// Mean error rate over deutan categories (1 and 4), one decimal.
    pub deutan_likelihood: f64,
    /// Mean error rate over protan categories (2 and 3), one decimal.
    pub protan_likelihood: f64,
    /// One-line summary.
    pub summary: String,
    /// Suggested next step.
    pub recommendation: String,
    /// Supporting lines, typically per-category error rates.
    pub details: Vec<String>,
}

impl Diagnosis {
    /// Returns true if the diagnosis reports no deficiency.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.status == DiagnosisStatus::Normal
    }
}
