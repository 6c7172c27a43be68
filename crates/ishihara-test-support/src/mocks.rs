//! Mock implementations of core port traits.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use ishihara_core::engine::parse_plate_name;
use ishihara_core::{DigitClassifier, DigitPrediction, PlateSource};

use crate::builders::{read_marker, SyntheticPlateBuilder};

/// In-memory plate source.
///
/// Holds plate bytes keyed by filename, plus optional names that are
/// listed but fail to read.
#[derive(Debug, Default)]
pub struct MockPlateSource {
    plates: BTreeMap<String, Vec<u8>>,
    unreadable: Vec<String>,
    listing_error: Option<String>,
    reads: AtomicUsize,
}

impl MockPlateSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source with a synthetic plate for each name.
    ///
    /// The image marker carries the digit parsed from the name, or 0 for
    /// names outside the plate naming convention.
    #[must_use]
    pub fn with_synthetic<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(Self::new(), |source, name| {
            let name = name.into();
            let digit = parse_plate_name(&name).map_or(0, |m| m.digit);
            source.plate(name, SyntheticPlateBuilder::new(digit).png_bytes())
        })
    }

    /// Creates a source whose listing always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            listing_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Adds a plate with explicit bytes.
    #[must_use]
    pub fn plate(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.plates.insert(name.into(), bytes);
        self
    }

    /// Adds a name that is listed but cannot be read.
    #[must_use]
    pub fn unreadable(mut self, name: impl Into<String>) -> Self {
        self.unreadable.push(name.into());
        self
    }

    /// Number of successful and failed `read` calls so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl PlateSource for MockPlateSource {
    fn names(&self) -> anyhow::Result<Vec<String>> {
        if let Some(message) = &self.listing_error {
            anyhow::bail!("{message}");
        }
        Ok(self
            .plates
            .keys()
            .chain(self.unreadable.iter())
            .cloned()
            .collect())
    }

    fn read(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.plates
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("cannot open {name}"))
    }
}

#[derive(Debug)]
enum Behaviour {
    Marker,
    Constant(u8),
    Fail(String),
}

/// Mock digit classifier.
///
/// Counts calls so tests can assert the classifier was, or was not,
/// consulted.
#[derive(Debug)]
pub struct MockDigitClassifier {
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl MockDigitClassifier {
    /// Decodes the image and returns the digit stored by
    /// [`SyntheticPlateBuilder`], with full confidence.
    #[must_use]
    pub const fn reading_marker() -> Self {
        Self::with(Behaviour::Marker)
    }

    /// Returns `digit` for every image.
    #[must_use]
    pub const fn constant(digit: u8) -> Self {
        Self::with(Behaviour::Constant(digit))
    }

    /// Fails every call with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with(Behaviour::Fail(message.into()))
    }

    const fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `classify` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DigitClassifier for MockDigitClassifier {
    fn classify(&self, image: &[u8]) -> anyhow::Result<DigitPrediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let digit = match &self.behaviour {
            Behaviour::Marker => {
                let decoded = image::load_from_memory(image)?;
                read_marker(&decoded)
            }
            Behaviour::Constant(digit) => *digit,
            Behaviour::Fail(message) => anyhow::bail!("{message}"),
        };

        let mut probabilities = [0.0; 10];
        probabilities[usize::from(digit.min(9))] = 1.0;
        Ok(DigitPrediction::from_probabilities(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_source_lists_all_names() {
        let source = MockPlateSource::with_synthetic(["3_Atheme_1 type_1.png", "junk.png"])
            .unreadable("5_Atheme_1 type_2.png");
        let names = source.names().unwrap_or_default();
        assert_eq!(names.len(), 3);
        assert!(source.read("5_Atheme_1 type_2.png").is_err());
        assert_eq!(source.read_count(), 1);
    }

    #[test]
    fn test_marker_classifier_reads_synthetic_digit() {
        let source = MockPlateSource::with_synthetic(["6_Atheme_1 type_4.png"]);
        let classifier = MockDigitClassifier::reading_marker();
        let bytes = source
            .read("6_Atheme_1 type_4.png")
            .unwrap_or_else(|e| panic!("{e}"));
        let prediction = classifier
            .classify(&bytes)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(prediction.digit, 6);
        assert_eq!(classifier.calls(), 1);
    }

    #[test]
    fn test_failing_classifier() {
        let classifier = MockDigitClassifier::failing("weights missing");
        let err = classifier.classify(&[]).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("weights missing"));
    }

    #[test]
    fn test_failing_source() {
        let source = MockPlateSource::failing("disk gone");
        assert!(source.names().is_err());
    }
}
