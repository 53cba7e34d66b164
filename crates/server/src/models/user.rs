//! User domain types.
//!
//! These types represent validated domain objects separate from database
//! row types. Password hashes and verification tokens never leave the
//! repository layer, so serializing a [`User`] is safe for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshtrack_core::{Email, UserId};

/// A FreshTrack user (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Per-user display preferences.
///
/// Stored as JSONB; unknown keys from older clients are dropped and missing
/// keys fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Show expiry as relative days (true) or as an absolute date (false).
    pub show_expiry_as_days: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_expiry_as_days: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_default() {
        assert!(Preferences::default().show_expiry_as_days);
    }

    #[test]
    fn test_preferences_missing_field_uses_default() {
        let prefs: Preferences = serde_json::from_str("{}").expect("deserialize");
        assert!(prefs.show_expiry_as_days);
    }

    #[test]
    fn test_preferences_camel_case() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"showExpiryAsDays": false}"#).expect("deserialize");
        assert!(!prefs.show_expiry_as_days);
    }
}
