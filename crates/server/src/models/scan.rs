//! Scan pipeline domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use freshtrack_core::ItemId;

use super::Item;

/// One uploaded image and the content type its sender declared.
///
/// Preprocessing re-encodes to JPEG where it can; when it falls back to the
/// original bytes, the declared type is what accompanies them upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type describing `bytes`.
    pub mime_type: String,
}

impl ScanImage {
    /// Create an image with an explicit content type.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// An image known to be JPEG-encoded.
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }
}

/// A recognition result that was not persisted.
///
/// Returned to unauthenticated callers and discarded server-side. The
/// sentinel [`ItemId::EPHEMERAL`] id and the `isGuest` flag tell the caller
/// the item was not saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Sentinel id marking this record as not persisted.
    pub id: ItemId,
    /// Recognized item name.
    pub name: String,
    /// Category from the closed vocabulary, or "General".
    pub category: String,
    /// Resolved expiry date (today + estimated days).
    pub expiry_date: DateTime<Utc>,
    /// Image URL if the upload step succeeded before the guest branch.
    pub image_url: Option<String>,
    /// Whether the model saw an explicit date on the packaging, rather than
    /// estimating one.
    pub found_expiry_date: bool,
    /// Always true; the caller must tell the user the item was not saved.
    pub is_guest: bool,
}

/// Outcome of a scan: either persisted for an owner or ephemeral for a guest.
///
/// A tagged union rather than an optional-id sentinel alone, so callers are
/// forced to handle both cases explicitly.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// The item was persisted for the authenticated caller.
    Saved(Item),
    /// No caller identity; the result was returned but never stored.
    Ephemeral(ScanResult),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ephemeral_result_shape() {
        let result = ScanResult {
            id: ItemId::EPHEMERAL,
            name: "Milk".to_owned(),
            category: "Dairy".to_owned(),
            expiry_date: Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid"),
            image_url: None,
            found_expiry_date: false,
            is_guest: true,
        };

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["id"], -1);
        assert_eq!(json["isGuest"], true);
        assert!(json.get("expiryDate").is_some());
    }
}
