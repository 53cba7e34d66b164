//! HTTP route handlers for the FreshTrack API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /api/auth/register              - Create account, send verification email
//! GET  /api/auth/verify?token=         - Verify email from emailed link
//! POST /api/auth/resend-verification   - Re-send verification email
//! POST /api/auth/login                 - Establish session
//! POST /api/auth/logout                - Clear session
//!
//! # Items (session-scoped)
//! GET    /api/items                    - List, soonest expiry first
//! POST   /api/items                    - Create
//! PATCH  /api/items/{id}               - Partial update
//! DELETE /api/items/{id}               - Delete
//!
//! # Scan
//! POST /api/scan                       - Multipart scan; guests get an
//!                                        ephemeral, unpersisted result
//!
//! # Misc
//! GET /api/notifications/check         - Items expiring within the window
//! GET /api/user/preferences            - Read preferences
//! PUT /api/user/preferences            - Replace preferences
//! ```

pub mod auth;
pub mod items;
pub mod notifications;
pub mod preferences;
pub mod scan;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/verify", get(auth::verify))
        .route("/resend-verification", post(auth::resend_verification))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list).post(items::create))
        .route("/{id}", axum::routing::patch(items::update).delete(items::delete))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/items", item_routes())
        .route("/api/scan", post(scan::scan))
        .route("/api/notifications/check", get(notifications::check))
        .route(
            "/api/user/preferences",
            get(preferences::get).put(preferences::put),
        )
}
