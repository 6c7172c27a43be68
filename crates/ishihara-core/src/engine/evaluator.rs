//! Response evaluator.
//!
//! Scores user answers against the digit classifier's ground truth and
//! aggregates the outcome per plate category.

use std::sync::Arc;

use tracing::{debug, info};

use super::{diagnose, PlateCatalog};
use crate::domain::{
    round1, CategoryReport, CategoryStats, DetailedResult, Evaluation, ResponseRecord,
};
use crate::error::{EngineError, EngineResult};
use crate::ports::{DigitClassifier, DigitPrediction};

/// Evaluates batches of responses.
///
/// Stateless between calls: ground truth is re-derived from the plate images
/// on every evaluation.
#[derive(Clone)]
pub struct ResponseEvaluator {
    catalog: PlateCatalog,
    classifier: Arc<dyn DigitClassifier>,
}

impl ResponseEvaluator {
    /// Creates an evaluator over `catalog` using `classifier` for ground truth.
    #[must_use]
    pub fn new(catalog: PlateCatalog, classifier: Arc<dyn DigitClassifier>) -> Self {
        Self {
            catalog,
            classifier,
        }
    }

    /// Classifies a single cataloged plate.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for unknown plates and
    /// [`EngineError::ClassifierUnavailable`] if inference fails.
    pub fn classify_plate(&self, filename: &str) -> EngineResult<DigitPrediction> {
        let bytes = self.catalog.read_plate(filename)?;
        self.classifier
            .classify(&bytes)
            .map_err(|e| EngineError::classifier(&e))
    }

    /// Scores `responses` and derives a diagnosis.
    ///
    /// Responses naming unknown, malformed or unreadable plates are skipped
    /// and count toward nothing. A classifier failure on any plate aborts
    /// the whole batch.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NoResponses`] if `responses` is empty
    /// - [`EngineError::ClassifierUnavailable`] if any classification fails
    /// - [`EngineError::Source`] if the plate source cannot be listed
    pub fn evaluate(&self, responses: &[ResponseRecord]) -> EngineResult<Evaluation> {
        if responses.is_empty() {
            return Err(EngineError::NoResponses);
        }

        let index = self.catalog.index()?;
        let mut stats = CategoryStats::new();
        let mut detailed_results = Vec::with_capacity(responses.len());
        let mut total_correct = 0u32;

        for response in responses {
            let Some(plate) = index.get(&response.filename) else {
                debug!("Skipping uncataloged plate: {:?}", response.filename);
                continue;
            };

            let bytes = match self.catalog.read_cataloged(plate) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("Skipping unreadable plate: {e}");
                    continue;
                }
            };

            let prediction = self
                .classifier
                .classify(&bytes)
                .map_err(|e| EngineError::classifier(&e))?;

            let is_correct = prediction.digit == response.user_answer;
            stats.record(plate.category, is_correct);
            if is_correct {
                total_correct += 1;
            }

            debug!(
                "{}: truth={} answer={} ({:.2})",
                plate.filename, prediction.digit, response.user_answer, prediction.confidence
            );

            detailed_results.push(DetailedResult {
                filename: plate.filename.clone(),
                correct_digit: prediction.digit,
                user_answer: response.user_answer,
                is_correct,
                category: plate.category,
            });
        }

        let total_questions = stats.total();
        let overall_accuracy = if total_questions > 0 {
            round1(f64::from(total_correct) / f64::from(total_questions) * 100.0)
        } else {
            0.0
        };

        let diagnosis = diagnose(&stats);

        info!(
            "Evaluated {} of {} responses: accuracy {:.1}%, status {:?}",
            total_questions,
            responses.len(),
            overall_accuracy,
            diagnosis.status
        );

        Ok(Evaluation {
            overall_accuracy,
            total_correct,
            total_questions,
            per_category_stats: stats.iter().map(CategoryReport::from).collect(),
            diagnosis,
            detailed_results,
        })
    }
}
