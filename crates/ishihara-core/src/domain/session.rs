//! Test session types.

use serde::{Deserialize, Serialize};

use super::PlateCategory;

/// One randomly drawn test instance.
///
/// Sessions are never stored server-side. The ground-truth digit of each
/// plate is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSession {
    /// Opaque random session token.
    #[serde(rename = "test_id")]
    pub session_id: String,
    /// Number of plates in the session.
    pub total_images: usize,
    /// Plates in presentation order.
    pub plates: Vec<SessionPlate>,
}

/// A plate as shown to the test taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlate {
    /// 1-based position within the session.
    #[serde(rename = "id")]
    pub sequence_number: usize,
    /// Plate filename, used to fetch the image and to submit the answer.
    pub filename: String,
    /// Colour-contrast category.
    pub category: PlateCategory,
}
