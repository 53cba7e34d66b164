//! Expiry classification.
//!
//! One pure function maps an optional expiry timestamp and the current time
//! to a presentation bucket and label. List views, detail views, and the
//! notification gate all use this same function so an item can never show
//! different states on different surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of seconds in a day, for whole-day ceiling arithmetic.
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Items at or below this many days remaining count as "expiring soon".
pub const SOON_THRESHOLD_DAYS: i64 = 3;

/// Derived presentation bucket for an item's expiry state.
///
/// Drives color/icon selection only; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryClass {
    /// Past its expiry date.
    Expired,
    /// Expires before the end of today.
    Today,
    /// Expires within [`SOON_THRESHOLD_DAYS`] days.
    Soon,
    /// More than [`SOON_THRESHOLD_DAYS`] days remaining.
    Ok,
    /// No expiry date recorded.
    Unknown,
}

/// Result of classifying an expiry date against a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryStatus {
    /// The presentation bucket.
    pub class: ExpiryClass,
    /// Whole days remaining (ceiling), or `None` when no expiry is known.
    pub days: Option<i64>,
    /// Human-readable label, e.g. "Expires in 2 days".
    pub label: String,
}

impl ExpiryStatus {
    /// Whether this item should count toward the expiring-soon alert
    /// (0 <= days <= [`SOON_THRESHOLD_DAYS`]).
    #[must_use]
    pub const fn is_expiring_soon(&self) -> bool {
        matches!(self.class, ExpiryClass::Today | ExpiryClass::Soon)
    }
}

/// Classify an expiry timestamp relative to `now`.
///
/// The day difference rounds partial days up (ceiling), so an item expiring
/// 23 hours from now counts as "1 day left", not "0". The result is a pure
/// function of `expiry - now`.
#[must_use]
pub fn classify(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ExpiryStatus {
    let Some(expiry) = expiry else {
        return ExpiryStatus {
            class: ExpiryClass::Unknown,
            days: None,
            label: "No expiry date".to_owned(),
        };
    };

    let days = (expiry - now).num_seconds().div_ceil(SECONDS_PER_DAY);

    let (class, label) = if days < 0 {
        (ExpiryClass::Expired, format!("Expired {} days ago", -days))
    } else if days == 0 {
        (ExpiryClass::Today, "Expires today".to_owned())
    } else if days <= SOON_THRESHOLD_DAYS {
        (ExpiryClass::Soon, format!("Expires in {days} days"))
    } else {
        (ExpiryClass::Ok, format!("Expires in {days} days"))
    };

    ExpiryStatus {
        class,
        days: Some(days),
        label,
    }
}
