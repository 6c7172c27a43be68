//! Plate catalog.
//!
//! Plate metadata is encoded in filenames as
//! `<digit>_<font>theme_<n> type_<category>`, e.g.
//! `7_Arialtheme_2 type_3.png`. This module is the only place that parses
//! that encoding; everything else works with [`PlateMetadata`].

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::{PlateCategory, PlateMetadata};
use crate::error::{EngineError, EngineResult};
use crate::ports::PlateSource;

#[allow(clippy::expect_used)]
static PLATE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d)_(.+?)theme_\d+ type_(\d)").expect("plate name regex is valid")
});

/// Parses plate metadata from a filename.
///
/// Returns `None` for names that do not follow the plate naming scheme or
/// whose category is outside 1-4.
#[must_use]
pub fn parse_plate_name(filename: &str) -> Option<PlateMetadata> {
    let caps = PLATE_NAME.captures(filename)?;
    let digit: u8 = caps.get(1)?.as_str().parse().ok()?;
    let font = caps.get(2)?.as_str().to_string();
    let category: u8 = caps.get(3)?.as_str().parse().ok()?;
    let category = PlateCategory::try_from(category).ok()?;

    Some(PlateMetadata {
        filename: filename.to_string(),
        digit,
        font,
        category,
    })
}

/// Returns true if `name` is a bare filename with no path components.
///
/// Dots inside a name are fine (`3_Mr..Atheme_1 type_1.png`); only the
/// `.` and `..` entries themselves are rejected.
fn is_bare_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Snapshot of the catalog keyed by filename.
#[derive(Debug, Clone, Default)]
pub struct PlateIndex {
    entries: HashMap<String, PlateMetadata>,
}

impl PlateIndex {
    /// Looks up a cataloged plate.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&PlateMetadata> {
        self.entries.get(filename)
    }
}

/// Read-only index over the plates available from a [`PlateSource`].
#[derive(Clone)]
pub struct PlateCatalog {
    source: Arc<dyn PlateSource>,
}

impl PlateCatalog {
    /// Creates a catalog backed by `source`.
    #[must_use]
    pub fn new(source: Arc<dyn PlateSource>) -> Self {
        Self { source }
    }

    /// Lists every plate whose name parses, sorted by filename.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Source`] if the source cannot be listed.
    pub fn list_plates(&self) -> EngineResult<Vec<PlateMetadata>> {
        let names = self.source.names().map_err(|e| EngineError::Source {
            reason: format!("{e:#}"),
        })?;

        let total = names.len();
        let mut plates: Vec<PlateMetadata> = names
            .iter()
            .filter_map(|name| {
                let parsed = parse_plate_name(name);
                if parsed.is_none() {
                    debug!("Excluding unparsable plate name: {name}");
                }
                parsed
            })
            .collect();
        plates.sort_by(|a, b| a.filename.cmp(&b.filename));

        debug!("Cataloged {} of {} entries", plates.len(), total);
        Ok(plates)
    }

    /// Builds a filename-keyed snapshot of the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Source`] if the source cannot be listed.
    pub fn index(&self) -> EngineResult<PlateIndex> {
        let entries = self
            .list_plates()?
            .into_iter()
            .map(|plate| (plate.filename.clone(), plate))
            .collect();
        Ok(PlateIndex { entries })
    }

    /// Returns the metadata of a cataloged plate.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the name is not cataloged, and
    /// [`EngineError::Source`] if the source cannot be listed.
    pub fn metadata(&self, filename: &str) -> EngineResult<PlateMetadata> {
        if !is_bare_filename(filename) {
            warn!("Rejected plate name with path components: {filename:?}");
            return Err(EngineError::not_found(filename));
        }

        self.index()?
            .get(filename)
            .cloned()
            .ok_or_else(|| EngineError::not_found(filename))
    }

    /// Reads the image bytes of a cataloged plate.
    ///
    /// The name must exactly match a cataloged entry; anything else,
    /// including names with directory separators, is `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the plate is unknown or unreadable.
    pub fn read_plate(&self, filename: &str) -> EngineResult<Vec<u8>> {
        let plate = self.metadata(filename)?;
        self.read_cataloged(&plate)
    }

    /// Reads a plate already resolved through the catalog.
    pub(crate) fn read_cataloged(&self, plate: &PlateMetadata) -> EngineResult<Vec<u8>> {
        self.source.read(&plate.filename).map_err(|e| {
            debug!("Failed to read plate {}: {e:#}", plate.filename);
            EngineError::not_found(&plate.filename)
        })
    }
}
