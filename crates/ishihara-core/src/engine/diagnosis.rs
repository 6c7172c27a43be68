//! Diagnosis engine.
//!
//! Derives a graded diagnosis from per-category error statistics:
//! - Deutan likelihood: mean error rate of categories 1 and 4
//! - Protan likelihood: mean error rate of categories 2 and 3
//! - Overall error rate across every scored response
//!
//! Categories with no scored responses are left out of the means.

use crate::domain::{
    round1, CategoryStats, Confidence, DeficiencyFamily, DeficiencyType, Diagnosis,
    DiagnosisStatus, PlateCategory, Severity,
};

/// Overall error rate (percent) below which vision is considered normal.
pub const THRESHOLD_LOW: f64 = 10.0;
/// Family likelihood (percent) at which a weakness is graded moderate.
pub const THRESHOLD_MODERATE: f64 = 30.0;
/// Family likelihood (percent) at which a deficiency is graded strong.
pub const THRESHOLD_HIGH: f64 = 50.0;

/// Error-rate indicators derived from category statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Likelihoods {
    /// Mean error rate of deutan categories with data.
    pub deutan: f64,
    /// Mean error rate of protan categories with data.
    pub protan: f64,
    /// Error rate over all scored responses.
    pub overall_error: f64,
}

impl Likelihoods {
    /// Computes likelihoods from statistics.
    #[must_use]
    pub fn from_stats(stats: &CategoryStats) -> Self {
        let total = stats.total();
        let overall_error = if total > 0 {
            f64::from(stats.mistakes()) / f64::from(total) * 100.0
        } else {
            0.0
        };

        Self {
            deutan: family_mean(stats, DeficiencyFamily::Deutan),
            protan: family_mean(stats, DeficiencyFamily::Protan),
            overall_error,
        }
    }
}

fn family_mean(stats: &CategoryStats, family: DeficiencyFamily) -> f64 {
    let rates: Vec<f64> = stats
        .iter()
        .filter(|s| s.category.family() == family)
        .filter_map(|s| s.error_rate())
        .collect();

    if rates.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = rates.len() as f64;
        rates.iter().sum::<f64>() / n
    }
}

/// Produces a diagnosis from per-category statistics.
///
/// Always returns a definite result; `inconclusive` is a diagnosis, not an
/// error.
#[must_use]
pub fn diagnose(stats: &CategoryStats) -> Diagnosis {
    let l = Likelihoods::from_stats(stats);

    let mut diagnosis = if l.overall_error < THRESHOLD_LOW {
        normal(
            Confidence::High,
            "Normal colour vision detected. No significant colour vision deficiency.",
            "No further action required. Your colour vision appears normal.",
            "All colour types were perceived correctly with minimal errors.",
        )
    } else if l.deutan > l.protan {
        graded(DeficiencyFamily::Deutan, l.deutan, stats)
    } else if l.protan > l.deutan {
        graded(DeficiencyFamily::Protan, l.protan, stats)
    } else if l.overall_error >= THRESHOLD_MODERATE {
        inconclusive(&l, stats)
    } else {
        normal(
            Confidence::Moderate,
            "Normal colour vision with minor inconsistencies.",
            "Your colour vision appears mostly normal. Retest if concerned.",
            "Errors are minimal and do not indicate a specific deficiency pattern.",
        )
    };

    diagnosis.deutan_likelihood = round1(l.deutan);
    diagnosis.protan_likelihood = round1(l.protan);
    diagnosis
}

fn normal(confidence: Confidence, summary: &str, recommendation: &str, detail: &str) -> Diagnosis {
    Diagnosis {
        status: DiagnosisStatus::Normal,
        severity: Severity::None,
        deficiency_type: None,
        confidence,
        deutan_likelihood: 0.0,
        protan_likelihood: 0.0,
        summary: summary.to_string(),
        recommendation: recommendation.to_string(),
        details: vec![detail.to_string()],
    }
}

/// Grades a deficiency in `family` by its likelihood.
fn graded(family: DeficiencyFamily, likelihood: f64, stats: &CategoryStats) -> Diagnosis {
    let (strong, weak, cone) = match family {
        DeficiencyFamily::Deutan => (
            DeficiencyType::Deuteranopia,
            DeficiencyType::Deuteranomaly,
            "green",
        ),
        DeficiencyFamily::Protan => (
            DeficiencyType::Protanopia,
            DeficiencyType::Protanomaly,
            "red",
        ),
    };

    let (status, severity, deficiency_type, confidence, summary, recommendation) =
        if likelihood >= THRESHOLD_HIGH {
            (
                DiagnosisStatus::ColourBlind,
                Severity::Strong,
                strong,
                Confidence::High,
                format!(
                    "Strong indication of {strong:?} ({cone}-blindness). Error rate: {likelihood:.1}%"
                ),
                "Please consult an eye care professional for a comprehensive colour vision examination.",
            )
        } else if likelihood >= THRESHOLD_MODERATE {
            (
                DiagnosisStatus::ColourWeak,
                Severity::Moderate,
                weak,
                Confidence::Moderate,
                format!(
                    "Moderate signs of {weak:?} ({cone}-weakness). Error rate: {likelihood:.1}%"
                ),
                "Consider seeing an eye care professional for further evaluation.",
            )
        } else {
            (
                DiagnosisStatus::PossibleWeakness,
                Severity::Mild,
                weak,
                Confidence::Low,
                format!("Mild signs of {cone} colour weakness. Error rate: {likelihood:.1}%"),
                "Monitor your colour vision. If symptoms persist, consult an eye care professional.",
            )
        };

    let details = PlateCategory::ALL
        .iter()
        .filter(|c| c.family() == family)
        .map(|&c| category_line(stats, c, true))
        .collect();

    Diagnosis {
        status,
        severity,
        deficiency_type: Some(deficiency_type),
        confidence,
        deutan_likelihood: 0.0,
        protan_likelihood: 0.0,
        summary,
        recommendation: recommendation.to_string(),
        details,
    }
}

fn inconclusive(l: &Likelihoods, stats: &CategoryStats) -> Diagnosis {
    Diagnosis {
        status: DiagnosisStatus::Inconclusive,
        severity: Severity::Varied,
        deficiency_type: None,
        confidence: Confidence::Low,
        deutan_likelihood: 0.0,
        protan_likelihood: 0.0,
        summary: format!(
            "Equal error rates detected (Deutan: {:.1}%, Protan: {:.1}%). Results are inconclusive.",
            l.deutan, l.protan
        ),
        recommendation: "This test shows mixed results. Please consult an eye care professional for a thorough examination.".to_string(),
        details: PlateCategory::ALL
            .iter()
            .map(|&c| category_line(stats, c, false))
            .collect(),
    }
}

fn category_line(stats: &CategoryStats, category: PlateCategory, describe: bool) -> String {
    let error = stats.get(category).error_percentage();
    if describe {
        format!(
            "Type {} errors ({}): {error:.1}%",
            category.number(),
            category.describe()
        )
    } else {
        format!("Type {} errors: {error:.1}%", category.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlateCategory::{GreenOrange, GreenYellow, RedGray, RedGreen};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_stats_are_normal() {
        let d = diagnose(&CategoryStats::new());
        assert_eq!(d.status, DiagnosisStatus::Normal);
        assert_eq!(d.severity, Severity::None);
        assert!(d.deficiency_type.is_none());
        assert!(approx(d.deutan_likelihood, 0.0));
        assert!(approx(d.protan_likelihood, 0.0));
    }

    #[test]
    fn test_all_correct_is_normal() {
        let stats = CategoryStats::new()
            .with(GreenOrange, 5, 0)
            .with(RedGreen, 5, 0)
            .with(RedGray, 5, 0)
            .with(GreenYellow, 5, 0);
        let d = diagnose(&stats);
        assert_eq!(d.status, DiagnosisStatus::Normal);
        assert_eq!(d.severity, Severity::None);
        assert!(d.deficiency_type.is_none());
    }

    #[test]
    fn test_exactly_ten_percent_is_not_normal() {
        let stats = CategoryStats::new()
            .with(GreenOrange, 10, 1)
            .with(GreenYellow, 10, 1);
        let l = Likelihoods::from_stats(&stats);
        assert!(approx(l.deutan, 10.0));
        assert!(approx(l.protan, 0.0));
        assert!(approx(l.overall_error, 10.0));

        let d = diagnose(&stats);
        assert_eq!(d.status, DiagnosisStatus::PossibleWeakness);
        assert_eq!(d.deficiency_type, Some(DeficiencyType::Deuteranomaly));
        assert_eq!(d.severity, Severity::Mild);
        assert_eq!(d.confidence, Confidence::Low);
        assert!(approx(d.deutan_likelihood, 10.0));
    }

    #[test]
    fn test_strong_protan() {
        let stats = CategoryStats::new()
            .with(RedGreen, 10, 6)
            .with(RedGray, 10, 5);
        let d = diagnose(&stats);
        assert!(approx(d.protan_likelihood, 55.0));
        assert!(approx(d.deutan_likelihood, 0.0));
        assert_eq!(d.status, DiagnosisStatus::ColourBlind);
        assert_eq!(d.deficiency_type, Some(DeficiencyType::Protanopia));
        assert_eq!(d.severity, Severity::Strong);
        assert_eq!(d.confidence, Confidence::High);
        assert_eq!(d.details.len(), 2);
        assert!(d.details[0].starts_with("Type 2 errors"));
        assert!(d.details[1].starts_with("Type 3 errors"));
    }

    #[test]
    fn test_moderate_deutan() {
        let stats = CategoryStats::new()
            .with(GreenOrange, 10, 4)
            .with(GreenYellow, 10, 3)
            .with(RedGreen, 10, 0);
        let d = diagnose(&stats);
        assert!(approx(d.deutan_likelihood, 35.0));
        assert_eq!(d.status, DiagnosisStatus::ColourWeak);
        assert_eq!(d.deficiency_type, Some(DeficiencyType::Deuteranomaly));
        assert_eq!(d.severity, Severity::Moderate);
        assert_eq!(d.confidence, Confidence::Moderate);
    }

    #[test]
    fn test_empty_category_excluded_from_mean() {
        // Category 4 has no data, so deutan is category 1 alone.
        let stats = CategoryStats::new().with(GreenOrange, 4, 2);
        let l = Likelihoods::from_stats(&stats);
        assert!(approx(l.deutan, 50.0));
        assert_eq!(diagnose(&stats).deficiency_type, Some(DeficiencyType::Deuteranopia));
    }

    #[test]
    fn test_equal_high_errors_inconclusive() {
        let stats = CategoryStats::new()
            .with(GreenOrange, 10, 4)
            .with(RedGreen, 10, 4);
        let d = diagnose(&stats);
        assert_eq!(d.status, DiagnosisStatus::Inconclusive);
        assert_eq!(d.severity, Severity::Varied);
        assert_eq!(d.confidence, Confidence::Low);
        assert!(d.deficiency_type.is_none());
        assert_eq!(d.details.len(), 4);
    }

    #[test]
    fn test_equal_moderate_errors_normal_with_note() {
        let stats = CategoryStats::new()
            .with(GreenOrange, 10, 2)
            .with(RedGreen, 10, 2);
        let d = diagnose(&stats);
        assert_eq!(d.status, DiagnosisStatus::Normal);
        assert_eq!(d.severity, Severity::None);
        assert!(d.deficiency_type.is_none());
        assert!(d.summary.contains("minor inconsistencies"));
    }

    #[test]
    fn test_deutan_severity_never_regresses() {
        let mut previous = Severity::None;
        for mistakes in 0..=10 {
            let stats = CategoryStats::new()
                .with(GreenOrange, 10, mistakes)
                .with(GreenYellow, 10, mistakes)
                .with(RedGreen, 10, 1);
            let d = diagnose(&stats);
            let l = Likelihoods::from_stats(&stats);

            if l.overall_error >= THRESHOLD_LOW && l.deutan > l.protan {
                assert!(d.severity >= previous, "regressed at {mistakes}");
                previous = d.severity;
                if l.deutan >= THRESHOLD_HIGH {
                    assert_eq!(d.severity, Severity::Strong);
                } else if l.deutan >= THRESHOLD_MODERATE {
                    assert_eq!(d.severity, Severity::Moderate);
                }
            }
        }
        assert_eq!(previous, Severity::Strong);
    }

    #[test]
    fn test_deutan_likelihood_monotonic_in_mistakes() {
        let mut last = -1.0;
        for mistakes in 0..=8 {
            let stats = CategoryStats::new()
                .with(GreenOrange, 8, mistakes)
                .with(RedGray, 8, 3);
            let l = Likelihoods::from_stats(&stats);
            assert!(l.deutan >= last);
            last = l.deutan;
        }
    }
}
