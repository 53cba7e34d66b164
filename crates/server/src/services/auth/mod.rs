//! Authentication service.
//!
//! Password registration/login (argon2id) and the email-verification token
//! lifecycle: one active token per user, regenerated on resend, cleared on
//! successful verification.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;

use freshtrack_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// How long a verification token stays valid.
const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Outcome of a verification attempt with a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The email was verified and the token cleared.
    Verified,
    /// The email was already verified; nothing was mutated (idempotent).
    AlreadyVerified,
}

/// Authentication service.
///
/// Handles user registration, login, and email verification.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// Returns the created user together with the verification token to be
    /// emailed. The caller owns email delivery; a send failure must not
    /// undo registration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let token = generate_verification_token();
        let token_expiry = verification_token_expiry(Utc::now());

        let user = self
            .users
            .create(&email, &password_hash, &token, token_expiry)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok((user, token))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Verify an email address with a token.
    ///
    /// Verifying an already-verified account succeeds without touching the
    /// token again.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if no user holds this token.
    /// Returns `AuthError::TokenExpired` if the token's validity window passed.
    pub async fn verify_email(&self, token: &str) -> Result<VerifyOutcome, AuthError> {
        let record = self
            .users
            .get_by_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if let Some(expiry) = record.token_expiry
            && expiry < Utc::now()
        {
            return Err(AuthError::TokenExpired);
        }

        if record.user.email_verified {
            return Ok(VerifyOutcome::AlreadyVerified);
        }

        self.users.mark_verified(record.user.id).await?;

        Ok(VerifyOutcome::Verified)
    }

    /// Regenerate the verification token for an unverified account.
    ///
    /// Returns `None` for unknown emails so the route can answer with a
    /// generic message that does not reveal account existence.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AlreadyVerified` if the account needs no token.
    pub async fn resend_verification(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        if user.email_verified {
            return Err(AuthError::AlreadyVerified);
        }

        let token = generate_verification_token();
        let token_expiry = verification_token_expiry(Utc::now());
        self.users
            .set_verification_token(user.id, &token, token_expiry)
            .await?;

        Ok(Some((user, token)))
    }
}

/// Generate a verification token: 32 random bytes, hex encoded.
#[must_use]
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compute the expiry timestamp for a freshly issued verification token.
#[must_use]
pub fn verification_token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_verification_token_format() {
        let token = generate_verification_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_verification_token_unique() {
        assert_ne!(generate_verification_token(), generate_verification_token());
    }

    #[test]
    fn test_token_expiry_is_24_hours() {
        let now = Utc::now();
        assert_eq!(verification_token_expiry(now) - now, Duration::hours(24));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("12345"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2pass").expect("hash");
        assert!(verify_password("hunter2pass", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
