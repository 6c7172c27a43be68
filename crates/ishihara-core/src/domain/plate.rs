//! Plate metadata types.

use serde::{Deserialize, Serialize};

/// Colour-contrast pattern a plate probes.
///
/// Serialized as its integer value (`1`..=`4`), which is also how it is
/// encoded in plate filenames (`type_<n>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlateCategory {
    /// Green figure on an orange field.
    GreenOrange = 1,
    /// Red figure on a green field.
    RedGreen = 2,
    /// Red figure on a gray field.
    RedGray = 3,
    /// Green figure on a yellow field.
    GreenYellow = 4,
}

impl PlateCategory {
    /// All categories in numeric order.
    pub const ALL: [Self; 4] = [
        Self::GreenOrange,
        Self::RedGreen,
        Self::RedGray,
        Self::GreenYellow,
    ];

    /// Returns the numeric category (1..=4).
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns the zero-based index into per-category tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Returns the deficiency family this category indicates.
    #[must_use]
    pub const fn family(self) -> DeficiencyFamily {
        match self {
            Self::GreenOrange | Self::GreenYellow => DeficiencyFamily::Deutan,
            Self::RedGreen | Self::RedGray => DeficiencyFamily::Protan,
        }
    }

    /// Short human-readable description of the contrast pattern.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::GreenOrange => "green vs orange",
            Self::RedGreen => "red vs green",
            Self::RedGray => "red vs gray",
            Self::GreenYellow => "green vs yellow",
        }
    }
}

impl From<PlateCategory> for u8 {
    fn from(category: PlateCategory) -> Self {
        category.number()
    }
}

impl TryFrom<u8> for PlateCategory {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::GreenOrange),
            2 => Ok(Self::RedGreen),
            3 => Ok(Self::RedGray),
            4 => Ok(Self::GreenYellow),
            other => Err(format!("plate category must be 1-4, got {other}")),
        }
    }
}

/// Colour-vision deficiency family.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeficiencyFamily {
    /// Green-cone deficiency (deuteranomaly / deuteranopia).
    Deutan,
    /// Red-cone deficiency (protanomaly / protanopia).
    Protan,
}

/// Metadata parsed from a plate filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateMetadata {
    /// Filename as it appears in the plate directory.
    pub filename: String,
    /// Digit drawn on the plate (0-9).
    pub digit: u8,
    /// Font family the digit was rendered with.
    pub font: String,
    /// Colour-contrast category.
    pub category: PlateCategory,
}
