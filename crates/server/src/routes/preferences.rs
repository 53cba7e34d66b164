//! User preferences route handlers.

use axum::{Json, extract::State};

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Preferences;
use crate::state::AppState;

/// Get the session user's preferences.
///
/// Users who never saved preferences get the defaults.
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Preferences>> {
    let preferences = UserRepository::new(state.pool())
        .get_preferences(user.id)
        .await?;

    Ok(Json(preferences))
}

/// Replace the session user's preferences.
pub async fn put(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(preferences): Json<Preferences>,
) -> Result<Json<Preferences>> {
    UserRepository::new(state.pool())
        .set_preferences(user.id, preferences)
        .await?;

    Ok(Json(preferences))
}
