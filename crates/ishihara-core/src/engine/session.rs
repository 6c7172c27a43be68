//! Session builder: draws a random plate set for one test.

use rand::seq::index;
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use super::PlateCatalog;
use crate::domain::{SessionPlate, TestSession};
use crate::error::{EngineError, EngineResult};

/// Smallest number of plates in a session.
pub const MIN_PLATES: usize = 15;
/// Largest number of plates in a session.
pub const MAX_PLATES: usize = 30;
/// Number of plates when the caller does not ask for a count.
pub const DEFAULT_PLATES: usize = 20;

/// Clamps a requested plate count into `MIN_PLATES..=MAX_PLATES`.
///
/// Any integer is accepted; negative requests become [`MIN_PLATES`].
#[must_use]
pub fn clamp_count(count: i64) -> usize {
    match usize::try_from(count) {
        Ok(count) => count.clamp(MIN_PLATES, MAX_PLATES),
        Err(_) if count < 0 => MIN_PLATES,
        Err(_) => MAX_PLATES,
    }
}

/// Builds randomized test sessions from a catalog.
#[derive(Clone)]
pub struct SessionBuilder {
    catalog: PlateCatalog,
    default_count: usize,
}

impl SessionBuilder {
    /// Creates a builder that uses [`DEFAULT_PLATES`] when no count is given.
    #[must_use]
    pub const fn new(catalog: PlateCatalog) -> Self {
        Self {
            catalog,
            default_count: DEFAULT_PLATES,
        }
    }

    /// Overrides the default plate count. The value is clamped like any request.
    #[must_use]
    pub fn with_default_count(mut self, count: usize) -> Self {
        self.default_count = count.clamp(MIN_PLATES, MAX_PLATES);
        self
    }

    /// Starts a session using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientData`] if the catalog is empty.
    pub fn start_session(&self, count: Option<i64>) -> EngineResult<TestSession> {
        self.start_session_with_rng(count, &mut rand::thread_rng())
    }

    /// Starts a session drawing plates with `rng`.
    ///
    /// Draws `min(clamped count, catalog size)` distinct plates uniformly at
    /// random. Sequence numbers follow the sampled order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientData`] if the catalog is empty, or
    /// [`EngineError::Source`] if it cannot be listed.
    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &self,
        count: Option<i64>,
        rng: &mut R,
    ) -> EngineResult<TestSession> {
        let requested = count.map_or(self.default_count, clamp_count);
        let plates = self.catalog.list_plates()?;

        if plates.is_empty() {
            return Err(EngineError::InsufficientData);
        }

        let amount = requested.min(plates.len());
        if amount < requested {
            debug!(
                "Catalog has {} plates, fewer than the {} requested",
                plates.len(),
                requested
            );
        }

        let drawn: Vec<SessionPlate> = index::sample(rng, plates.len(), amount)
            .into_iter()
            .enumerate()
            .map(|(position, i)| SessionPlate {
                sequence_number: position + 1,
                filename: plates[i].filename.clone(),
                category: plates[i].category,
            })
            .collect();

        let session = TestSession {
            session_id: Uuid::new_v4().to_string(),
            total_images: drawn.len(),
            plates: drawn,
        };

        info!(
            "Started session {} with {} plates",
            session.session_id, session.total_images
        );
        Ok(session)
    }
}
