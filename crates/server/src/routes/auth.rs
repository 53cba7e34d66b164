//! Authentication route handlers.
//!
//! Registration, email verification, and session login/logout. Responses
//! are JSON; the session cookie is the only authentication mechanism.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::services::auth::VerifyOutcome;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Resend-verification request body.
#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

/// Verification link query parameters.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

/// User summary plus a human-readable message.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
    pub message: String,
}

/// Register a new account and send the verification email.
///
/// Email delivery is best-effort: a send failure is logged and the
/// registration still succeeds, since the token can be re-sent later.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let (user, token) = auth.register(&body.email, &body.password).await?;

    if let Some(email) = state.email() {
        if let Err(e) = email
            .send_verification_email(user.email.as_str(), &token)
            .await
        {
            tracing::warn!(error = %e, "Verification email failed to send at registration");
        }
    } else {
        tracing::warn!("Email service not configured, verification email skipped");
    }

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(UserResponse {
        user,
        message: "Registration successful. Check your email to verify your account.".to_owned(),
    }))
}

/// Verify an email address from the emailed link.
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing verification token".to_owned()))?;

    let auth = AuthService::new(state.pool());
    let message = match auth.verify_email(&token).await? {
        VerifyOutcome::Verified => "Email verified successfully",
        VerifyOutcome::AlreadyVerified => "Email is already verified",
    };

    Ok(Json(json!({ "message": message })))
}

/// Re-send the verification email with a fresh token.
///
/// Unknown emails get the same generic answer as known ones, so the
/// endpoint cannot be used to probe for accounts.
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<ResendRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    if let Some((user, token)) = auth.resend_verification(&body.email).await? {
        let email = state.email().ok_or_else(|| {
            AppError::UpstreamUnavailable("Email delivery not configured".to_owned())
        })?;
        email
            .send_verification_email(user.email.as_str(), &token)
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
    }

    Ok(Json(json!({
        "message": "If an account exists for that address, a verification email has been sent."
    })))
}

/// Log in with email and password, establishing a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(UserResponse {
        user,
        message: "Logged in".to_owned(),
    }))
}

/// Log out, clearing the session.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Json(json!({ "message": "Logged out" })))
}
