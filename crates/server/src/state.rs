//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::{EmailService, GeminiClient, MediaStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Optional services reflect optional
/// configuration: a missing vision client makes scans fail with a specific
/// error, a missing media store or email service only degrades behavior.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    gemini: Option<GeminiClient>,
    media: Option<MediaStore>,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Optional services are constructed only when their configuration is
    /// present.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be constructed.
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let gemini = config.gemini.as_ref().map(GeminiClient::new);
        let media = config.media.as_ref().map(MediaStore::new);
        let email = match &config.email {
            Some(email_config) => Some(EmailService::new(email_config, &config.base_url)?),
            None => None,
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gemini,
                media,
                email,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the vision client, if configured.
    #[must_use]
    pub fn gemini(&self) -> Option<&GeminiClient> {
        self.inner.gemini.as_ref()
    }

    /// Get the media store, if configured.
    #[must_use]
    pub fn media(&self) -> Option<&MediaStore> {
        self.inner.media.as_ref()
    }

    /// Get the email service, if configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
