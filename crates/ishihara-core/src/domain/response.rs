//! Response and scoring types.

use serde::{Deserialize, Serialize};

use super::{Diagnosis, PlateCategory};

/// A single answer submitted by the test taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Plate filename the answer refers to.
    pub filename: String,
    /// Digit the user reported seeing.
    pub user_answer: u8,
}

impl ResponseRecord {
    /// Creates a response record.
    #[must_use]
    pub fn new(filename: impl Into<String>, user_answer: u8) -> Self {
        Self {
            filename: filename.into(),
            user_answer,
        }
    }
}

/// Error counts for one plate category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatistic {
    /// Category these counts belong to.
    pub category: PlateCategory,
    /// Number of scored responses.
    pub total: u32,
    /// Number of scored responses that differed from ground truth.
    pub mistakes: u32,
}

impl CategoryStatistic {
    /// Creates an empty statistic for `category`.
    #[must_use]
    pub const fn empty(category: PlateCategory) -> Self {
        Self {
            category,
            total: 0,
            mistakes: 0,
        }
    }

    /// Records one scored response.
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if !correct {
            self.mistakes += 1;
        }
    }

    /// Unrounded error rate in percent, or `None` when nothing was scored.
    #[must_use]
    pub fn error_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.mistakes) / f64::from(self.total) * 100.0)
    }

    /// Error rate in percent, rounded to one decimal. `0` when empty.
    #[must_use]
    pub fn error_percentage(&self) -> f64 {
        round1(self.error_rate().unwrap_or(0.0))
    }

    /// Share of correct answers in percent, rounded to one decimal. `100` when empty.
    #[must_use]
    pub fn normal_percentage(&self) -> f64 {
        round1(100.0 - self.error_rate().unwrap_or(0.0))
    }
}

/// Per-category statistics for all four categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    stats: [CategoryStatistic; 4],
}

impl CategoryStats {
    /// Creates zeroed statistics for every category.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: PlateCategory::ALL.map(CategoryStatistic::empty),
        }
    }

    /// Sets the counts for a category. `mistakes` is capped at `total`.
    #[must_use]
    pub fn with(mut self, category: PlateCategory, total: u32, mistakes: u32) -> Self {
        self.stats[category.index()] = CategoryStatistic {
            category,
            total,
            mistakes: mistakes.min(total),
        };
        self
    }

    /// Records one scored response for `category`.
    pub fn record(&mut self, category: PlateCategory, correct: bool) {
        self.stats[category.index()].record(correct);
    }

    /// Returns the statistic for `category`.
    #[must_use]
    pub fn get(&self, category: PlateCategory) -> &CategoryStatistic {
        &self.stats[category.index()]
    }

    /// Iterates statistics in category order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryStatistic> {
        self.stats.iter()
    }

    /// Sum of totals over all categories.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.stats.iter().map(|s| s.total).sum()
    }

    /// Sum of mistakes over all categories.
    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.stats.iter().map(|s| s.mistakes).sum()
    }
}

impl Default for CategoryStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized view of a category statistic, with derived percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Category number.
    pub category: PlateCategory,
    /// Number of scored responses.
    pub total: u32,
    /// Number of wrong answers.
    pub mistakes: u32,
    /// Error rate in percent (one decimal).
    pub error_percentage: f64,
    /// Correct rate in percent (one decimal).
    pub normal_percentage: f64,
}

impl From<&CategoryStatistic> for CategoryReport {
    fn from(stat: &CategoryStatistic) -> Self {
        Self {
            category: stat.category,
            total: stat.total,
            mistakes: stat.mistakes,
            error_percentage: stat.error_percentage(),
            normal_percentage: stat.normal_percentage(),
        }
    }
}

/// Scoring outcome for a single response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedResult {
    /// Plate filename.
    pub filename: String,
    /// Ground-truth digit reported by the classifier.
    pub correct_digit: u8,
    /// Digit the user answered.
    pub user_answer: u8,
    /// Whether the answer matched ground truth.
    pub is_correct: bool,
    /// Plate category.
    pub category: PlateCategory,
}

/// Complete result of evaluating a batch of responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Percentage of scored responses that were correct (one decimal).
    pub overall_accuracy: f64,
    /// Number of correct responses.
    pub total_correct: u32,
    /// Number of scored responses.
    pub total_questions: u32,
    /// Statistics for categories 1 to 4, in order.
    pub per_category_stats: Vec<CategoryReport>,
    /// Derived diagnosis.
    pub diagnosis: Diagnosis,
    /// Per-response outcomes, in input order.
    pub detailed_results: Vec<DetailedResult>,
}

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
