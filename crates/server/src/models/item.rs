//! Inventory item domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use freshtrack_core::{ExpiryStatus, ItemId, ItemStatus, UserId, classify};

/// A persisted inventory item.
///
/// Serializes to the API's camelCase JSON shape. The owner is implied by the
/// session that fetched the item and is not exposed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Item name, non-empty.
    pub name: String,
    /// Category, defaults to "General".
    pub category: String,
    /// Quantity on hand; accepted and stored, no consumption flow yet.
    pub quantity: i32,
    /// Expiry date; `None` means "no known expiry".
    pub expiry_date: Option<DateTime<Utc>>,
    /// Lifecycle status; only `available` is produced today.
    pub status: ItemStatus,
    /// URL of the stored representative image, if one was uploaded.
    pub image_url: Option<String>,
    /// Owning user.
    #[serde(skip_serializing)]
    pub owner_id: UserId,
    /// Creation timestamp, immutable.
    pub added_at: DateTime<Utc>,
}

impl Item {
    /// Derive the expiry presentation state for this item at `now`.
    #[must_use]
    pub fn expiry_status(&self, now: DateTime<Utc>) -> ExpiryStatus {
        classify(self.expiry_date, now)
    }
}
