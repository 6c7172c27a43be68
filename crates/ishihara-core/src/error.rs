//! Error taxonomy for engine operations.

use thiserror::Error;

/// Errors surfaced to callers of the test engine.
///
/// Malformed plate names are never reported here; they are filtered out of
/// the catalog instead.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// The plate is not in the catalog, or its image cannot be read.
    #[error("plate not found: {filename}")]
    NotFound {
        /// Requested filename.
        filename: String,
    },

    /// The catalog holds no usable plates.
    #[error("no test plates available")]
    InsufficientData,

    /// The response batch was empty.
    #[error("no responses provided")]
    NoResponses,

    /// The digit classifier could not be loaded or failed during inference.
    #[error("digit classifier unavailable: {reason}")]
    ClassifierUnavailable {
        /// Underlying failure, including its context chain.
        reason: String,
    },

    /// The plate source could not be listed.
    #[error("plate source unavailable: {reason}")]
    Source {
        /// Underlying failure.
        reason: String,
    },
}

impl EngineError {
    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InsufficientData => "insufficient_data",
            Self::NoResponses => "no_responses",
            Self::ClassifierUnavailable { .. } => "classifier_unavailable",
            Self::Source { .. } => "source_unavailable",
        }
    }

    pub(crate) fn not_found(filename: impl Into<String>) -> Self {
        Self::NotFound {
            filename: filename.into(),
        }
    }

    pub(crate) fn classifier(err: &anyhow::Error) -> Self {
        Self::ClassifierUnavailable {
            reason: format!("{err:#}"),
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(EngineError::not_found("x.png").code(), "not_found");
        assert_eq!(EngineError::InsufficientData.code(), "insufficient_data");
        assert_eq!(EngineError::NoResponses.code(), "no_responses");
        assert_eq!(
            EngineError::classifier(&anyhow::anyhow!("boom")).code(),
            "classifier_unavailable"
        );
    }

    #[test]
    fn test_classifier_reason_keeps_context_chain() {
        let err = anyhow::anyhow!("file missing").context("Failed to load digit model");
        let engine_err = EngineError::classifier(&err);
        let message = engine_err.to_string();
        assert!(message.contains("Failed to load digit model"));
        assert!(message.contains("file missing"));
    }
}
