//! Integration tests for registration, verification, and sessions.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The server running (cargo run -p freshtrack-server)
//!
//! Run with: cargo test -p freshtrack-integration-tests -- --ignored

use freshtrack_integration_tests::{base_url, client, db_pool, random_email, registered_client};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_returns_user_summary() {
    let client = client();
    let email = random_email();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({"email": email, "password": "test-password-1"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("not JSON");
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["emailVerified"], false);
    // Password and hash must never appear in responses
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_duplicate_email_is_400() {
    let client = client();
    let email = random_email();
    let base = base_url();

    let first = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({"email": email, "password": "test-password-1"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(first.status(), StatusCode::OK);

    let second = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({"email": email, "password": "test-password-1"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.expect("not JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_short_password_is_400() {
    let resp = client()
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({"email": random_email(), "password": "12345"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_then_verify_round_trip() {
    let client = client();
    let email = random_email();
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({"email": email, "password": "test-password-1"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // The verification link lands in an email; fish the token out of the
    // database instead
    let pool = db_pool().await;
    let (token,): (Option<String>,) =
        sqlx::query_as("SELECT verification_token FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .expect("registered user row");
    let token = token.expect("registration issues a verification token");

    let resp = client
        .get(format!("{base}/api/auth/verify?token={token}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let (verified, stored): (bool, Option<String>) =
        sqlx::query_as("SELECT email_verified, verification_token FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .expect("verified user row");
    assert!(verified);
    assert!(stored.is_none(), "token must be cleared on verification");

    // A consumed token is no better than a bogus one
    let resp = client
        .get(format!("{base}/api/auth/verify?token={token}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_verify_with_bogus_token_is_400() {
    let resp = client()
        .get(format!(
            "{}/api/auth/verify?token=not-a-real-token",
            base_url()
        ))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_verify_without_token_is_400() {
    let resp = client()
        .get(format!("{}/api/auth/verify", base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_resend_verification_is_generic_for_unknown_email() {
    let resp = client()
        .post(format!("{}/api/auth/resend-verification", base_url()))
        .json(&json!({"email": random_email()}))
        .send()
        .await
        .expect("request failed");

    // Unknown address gets the same 200 as a known one
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_wrong_password_is_401() {
    let (_, email) = registered_client().await;

    let resp = client()
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"email": email, "password": "wrong-password"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_logout_drops_session() {
    let (client, _) = registered_client().await;
    let base = base_url();

    // Session works before logout
    let resp = client
        .get(format!("{base}/api/user/preferences"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base}/api/auth/logout"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/api/user/preferences"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_preferences_roundtrip() {
    let (client, _) = registered_client().await;
    let base = base_url();

    let resp = client
        .get(format!("{base}/api/user/preferences"))
        .send()
        .await
        .expect("request failed");
    let defaults: Value = resp.json().await.expect("not JSON");
    assert_eq!(defaults["showExpiryAsDays"], true);

    let resp = client
        .put(format!("{base}/api/user/preferences"))
        .json(&json!({"showExpiryAsDays": false}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/api/user/preferences"))
        .send()
        .await
        .expect("request failed");
    let updated: Value = resp.json().await.expect("not JSON");
    assert_eq!(updated["showExpiryAsDays"], false);
}
