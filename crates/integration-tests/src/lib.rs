//! Integration tests for FreshTrack.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and server
//! docker compose up -d postgres
//! cargo run -p freshtrack-server
//!
//! # Run integration tests (they are #[ignore]d by default)
//! cargo test -p freshtrack-integration-tests -- --ignored
//! ```
//!
//! Tests talk HTTP to a running server at `FRESHTRACK_BASE_URL`
//! (default `http://localhost:3000`) and assert on JSON responses. They
//! create their own throwaway accounts with random email addresses, so
//! they are safe to run repeatedly against the same database.

use rand::RngCore;
use reqwest::Client;
use serde_json::{Value, json};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("FRESHTRACK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A fresh cookie-holding client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the database the server under test is using.
///
/// For assertions on server-side state the API deliberately does not
/// expose: verification tokens, raw row counts.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails.
pub async fn db_pool() -> PgPool {
    let url = std::env::var("FRESHTRACK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("FRESHTRACK_DATABASE_URL or DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// A random, unique test email address.
#[must_use]
pub fn random_email() -> String {
    let mut bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut bytes);
    format!("test-{}@freshtrack.test", hex::encode(bytes))
}

/// Register an account and log in, returning the logged-in client and email.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn registered_client() -> (Client, String) {
    let client = client();
    let email = random_email();
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({"email": email, "password": "test-password-1"}))
        .send()
        .await
        .expect("register request failed");
    assert!(
        resp.status().is_success(),
        "registration failed: {}",
        resp.status()
    );

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({"email": email, "password": "test-password-1"}))
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    (client, email)
}

/// Create an item via the API and return its JSON.
///
/// # Panics
///
/// Panics if the request fails or the item is not created.
pub async fn create_item(client: &Client, name: &str) -> Value {
    let resp = client
        .post(format!("{}/api/items", base_url()))
        .json(&json!({"name": name}))
        .send()
        .await
        .expect("create item request failed");
    assert!(resp.status().is_success());
    resp.json().await.expect("item response not JSON")
}
