//! Expiry alert gating.
//!
//! The gate decides whether an aggregate "items expiring soon" alert may be
//! shown, and throttles it to one per cooldown window no matter how often
//! the inventory is reloaded. It is pure state + clock arithmetic; the
//! caller owns platform permission checks and the alert itself.

use chrono::{DateTime, Duration, Utc};

use crate::models::Item;

/// Minimum time between two alerts.
pub const ALERT_COOLDOWN: Duration = Duration::hours(24);

/// Count items that warrant an alert: class Today or Soon (0 ≤ days ≤ 3).
///
/// Expired items and items without an expiry date do not count; they are
/// visible in the list but no longer actionable.
#[must_use]
pub fn expiring_soon_count(items: &[Item], now: DateTime<Utc>) -> usize {
    items
        .iter()
        .filter(|item| item.expiry_status(now).is_expiring_soon())
        .count()
}

/// Throttle state for the aggregate expiry alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationGate {
    last_alert: Option<DateTime<Utc>>,
}

impl NotificationGate {
    /// Create a gate that has never alerted.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_alert: None }
    }

    /// Whether an alert may be shown for `count` expiring items at `now`.
    #[must_use]
    pub fn should_alert(&self, count: usize, now: DateTime<Utc>) -> bool {
        if count == 0 {
            return false;
        }
        match self.last_alert {
            None => true,
            Some(last) => now - last > ALERT_COOLDOWN,
        }
    }

    /// Record that an alert was shown at `now`.
    ///
    /// Called regardless of whether the user interacts with the alert.
    pub const fn record_alert(&mut self, now: DateTime<Utc>) {
        self.last_alert = Some(now);
    }

    /// The aggregate alert message for `count` expiring items.
    #[must_use]
    pub fn message(count: usize) -> String {
        format!("You have {count} items expiring soon!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use freshtrack_core::{ItemId, ItemStatus, UserId};

    fn item_expiring_in(days: Option<i64>, now: DateTime<Utc>) -> Item {
        Item {
            id: ItemId::new(1),
            name: "Test".to_owned(),
            category: "General".to_owned(),
            quantity: 1,
            expiry_date: days.map(|d| now + Duration::days(d)),
            status: ItemStatus::Available,
            image_url: None,
            owner_id: UserId::new(1),
            added_at: now,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid")
    }

    #[test]
    fn test_expiring_soon_count_window() {
        let now = now();
        let items = vec![
            item_expiring_in(Some(5), now),  // ok, not soon
            item_expiring_in(Some(2), now),  // soon
            item_expiring_in(Some(-1), now), // expired, excluded
            item_expiring_in(None, now),     // unknown, excluded
        ];
        assert_eq!(expiring_soon_count(&items, now), 1);
    }

    #[test]
    fn test_expiring_today_counts() {
        let now = now();
        let items = vec![item_expiring_in(Some(0), now)];
        assert_eq!(expiring_soon_count(&items, now), 1);
    }

    #[test]
    fn test_no_alert_for_zero_count() {
        let gate = NotificationGate::new();
        assert!(!gate.should_alert(0, now()));
    }

    #[test]
    fn test_first_alert_allowed() {
        let gate = NotificationGate::new();
        assert!(gate.should_alert(3, now()));
    }

    #[test]
    fn test_cooldown_suppresses_repeat_alerts() {
        let now = now();
        let mut gate = NotificationGate::new();
        gate.record_alert(now);

        assert!(!gate.should_alert(3, now));
        assert!(!gate.should_alert(3, now + Duration::hours(23)));
        assert!(!gate.should_alert(3, now + ALERT_COOLDOWN));
        assert!(gate.should_alert(3, now + ALERT_COOLDOWN + Duration::seconds(1)));
    }

    #[test]
    fn test_record_alert_resets_window() {
        let now = now();
        let mut gate = NotificationGate::new();
        gate.record_alert(now);
        gate.record_alert(now + Duration::hours(25));

        assert!(!gate.should_alert(1, now + Duration::hours(26)));
        assert!(gate.should_alert(1, now + Duration::hours(50)));
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            NotificationGate::message(4),
            "You have 4 items expiring soon!"
        );
    }
}
