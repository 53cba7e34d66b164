//! User repository for database operations.
//!
//! Queries use runtime `query_as` with `FromRow` row types; rows are
//! converted to domain types at the boundary so invalid stored data surfaces
//! as `DataCorruption` instead of leaking outward.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use freshtrack_core::{Email, UserId};

use super::RepositoryError;
use crate::models::{Preferences, User};

/// Database row for a user, including verification state.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    email_verified: bool,
    verification_token_expiry: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email,
            email_verified: self.email_verified,
            created_at: self.created_at,
        })
    }
}

/// A user together with their email-verification state, for the verify flow.
#[derive(Debug)]
pub struct VerificationRecord {
    pub user: User,
    pub token_expiry: Option<DateTime<Utc>>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a password hash and an initial verification token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        verification_token: &str,
        token_expiry: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, password_hash, verification_token, verification_token_expiry)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, email_verified, verification_token_expiry, created_at
            ",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .bind(verification_token)
        .bind(token_expiry)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_domain()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, email_verified, verification_token_expiry, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct PasswordRow {
            id: i32,
            email: String,
            email_verified: bool,
            verification_token_expiry: Option<DateTime<Utc>>,
            created_at: DateTime<Utc>,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, PasswordRow>(
            r"
            SELECT id, email, email_verified, verification_token_expiry, created_at, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let password_hash = r.password_hash.clone();
        let user = UserRow {
            id: r.id,
            email: r.email,
            email_verified: r.email_verified,
            verification_token_expiry: r.verification_token_expiry,
            created_at: r.created_at,
        }
        .into_domain()?;

        Ok(Some((user, password_hash)))
    }

    /// Look up a user by verification token, returning the token expiry too.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, email_verified, verification_token_expiry, created_at
            FROM users
            WHERE verification_token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let token_expiry = r.verification_token_expiry;
                Ok(Some(VerificationRecord {
                    user: r.into_domain()?,
                    token_expiry,
                }))
            }
            None => Ok(None),
        }
    }

    /// Mark a user's email as verified and clear the single-use token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_verified(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET email_verified = TRUE,
                verification_token = NULL,
                verification_token_expiry = NULL
            WHERE id = $1
            ",
        )
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace the user's verification token (resend flow).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_verification_token(
        &self,
        user_id: UserId,
        token: &str,
        token_expiry: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET verification_token = $2,
                verification_token_expiry = $3
            WHERE id = $1
            ",
        )
        .bind(user_id.as_i32())
        .bind(token)
        .bind(token_expiry)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get a user's display preferences, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_preferences(&self, user_id: UserId) -> Result<Preferences, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct PreferencesRow {
            preferences: Option<String>,
        }

        let row = sqlx::query_as::<_, PreferencesRow>(
            r"
            SELECT preferences::text AS preferences
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        // Stored preferences from older clients may be partial; serde
        // defaults fill the gaps.
        let preferences = row
            .preferences
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();

        Ok(preferences)
    }

    /// Replace a user's display preferences.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_preferences(
        &self,
        user_id: UserId,
        preferences: Preferences,
    ) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(&preferences).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize preferences: {e}"))
        })?;

        let result = sqlx::query(
            r"
            UPDATE users
            SET preferences = $2::jsonb
            WHERE id = $1
            ",
        )
        .bind(user_id.as_i32())
        .bind(json)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
