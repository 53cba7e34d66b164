//! Notifications check route handler.
//!
//! Returns the session user's items inside the alert window so the client
//! can decide whether to show the aggregate expiry alert. The query is
//! scoped to the session user; an unauthenticated call gets an empty
//! result rather than other users' items.

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use serde::Serialize;

use freshtrack_core::SOON_THRESHOLD_DAYS;

use crate::db::ItemRepository;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::notify::expiring_soon_count;
use crate::state::AppState;

/// One expiring item in the check response.
#[derive(Debug, Serialize)]
pub struct ExpiringItem {
    pub name: String,
    /// Whole days until expiry, ceiling-rounded; negative when expired.
    pub days: Option<i64>,
}

/// Response for the notifications check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// Items warranting an alert (expiring today or within the window).
    pub count: usize,
    /// Every item at or past the alert cutoff, including already-expired
    /// ones, soonest first.
    pub items: Vec<ExpiringItem>,
}

/// Check for items expiring soon.
pub async fn check(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CheckResponse>> {
    let Some(user) = user else {
        return Ok(Json(CheckResponse {
            count: 0,
            items: Vec::new(),
        }));
    };

    let now = Utc::now();
    let cutoff = now + Duration::days(SOON_THRESHOLD_DAYS);
    let items = ItemRepository::new(state.pool())
        .expiring_before(user.id, cutoff)
        .await?;

    let count = expiring_soon_count(&items, now);
    let items = items
        .into_iter()
        .map(|item| {
            let days = item.expiry_status(now).days;
            ExpiringItem {
                name: item.name,
                days,
            }
        })
        .collect();

    Ok(Json(CheckResponse { count, items }))
}
