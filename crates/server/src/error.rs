//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`;
//! nothing propagates to the caller as an unhandled fault, and no internal
//! detail reaches the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::scan::ScanError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Bad or missing input from the client.
    #[error("{0}")]
    Validation(String),

    /// No valid session for an endpoint that requires one.
    #[error("Unauthorized")]
    Unauthorized,

    /// Missing id or ownership mismatch; the two are deliberately
    /// indistinguishable to avoid leaking existence.
    #[error("{0}")]
    NotFound(String),

    /// A required upstream provider is not configured.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// An upstream provider failed or returned unusable output.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Item not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Validation(msg),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized,
            AuthError::UserAlreadyExists => Self::Validation("User already exists".to_owned()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::AlreadyVerified => {
                Self::Validation(err.to_string())
            }
            AuthError::Repository(repo) => repo.into(),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
        }
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NoImages => Self::Validation("No image provided".to_owned()),
            ScanError::TooManyImages { max } => {
                Self::Validation(format!("At most {max} images per scan"))
            }
            ScanError::ProviderNotConfigured => {
                Self::UpstreamUnavailable("Vision provider not configured".to_owned())
            }
            ScanError::Recognition(e) => Self::Upstream(e.to_string()),
            ScanError::UnrecognizedResponse(msg) => Self::Upstream(msg),
            ScanError::Repository(repo) => repo.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-class errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Upstream(_) | Self::UpstreamUnavailable(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_)
            | Self::Internal(_)
            | Self::Upstream(_)
            | Self::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients. UpstreamUnavailable
        // keeps its specific message (misconfiguration is actionable); plain
        // upstream failures get the generic message.
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Upstream(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("name is required".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::NotFound("Item not found".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::UpstreamUnavailable("provider".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_ownership_mismatch_is_not_distinguished() {
        // Missing and not-yours both surface as the same message
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.to_string(), "Item not found");
    }

    #[test]
    fn test_verification_token_errors_map_to_400() {
        assert_eq!(
            get_status(AuthError::InvalidToken.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::TokenExpired.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::AlreadyVerified.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_scan_validation_maps_to_400() {
        assert_eq!(
            get_status(ScanError::NoImages.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ScanError::TooManyImages { max: 3 }.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_provider_unconfigured_keeps_specific_message() {
        let err: AppError = ScanError::ProviderNotConfigured.into();
        assert_eq!(err.to_string(), "Vision provider not configured");
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
