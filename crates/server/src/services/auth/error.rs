//! Authentication error types.

use thiserror::Error;

use freshtrack_core::EmailError;

use crate::db::RepositoryError;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password combination is wrong. One variant for both a missing
    /// account and a bad password, to avoid revealing which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Verification token does not match any user.
    #[error("invalid verification token")]
    InvalidToken,

    /// Verification token exists but has expired.
    #[error("verification token has expired")]
    TokenExpired,

    /// The account's email is already verified.
    #[error("email is already verified")]
    AlreadyVerified,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing or parsing failed.
    #[error("password hash error")]
    PasswordHash,
}
