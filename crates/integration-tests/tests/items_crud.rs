//! Integration tests for inventory item CRUD and ownership scoping.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The server running (cargo run -p freshtrack-server)
//!
//! Run with: cargo test -p freshtrack-integration-tests -- --ignored

use chrono::{Duration, Utc};
use freshtrack_integration_tests::{base_url, client, create_item, registered_client};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_item_crud_roundtrip() {
    let (client, _) = registered_client().await;
    let base = base_url();

    let created = create_item(&client, "Milk").await;
    assert_eq!(created["name"], "Milk");
    assert_eq!(created["category"], "General");
    assert_eq!(created["status"], "available");
    let id = created["id"].as_i64().expect("item id");

    let resp = client
        .patch(format!("{base}/api/items/{id}"))
        .json(&json!({"name": "Whole Milk", "category": "Dairy"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("not JSON");
    assert_eq!(updated["name"], "Whole Milk");
    assert_eq!(updated["category"], "Dairy");

    let resp = client
        .delete(format!("{base}/api/items/{id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("not JSON");
    assert_eq!(body["success"], true);

    // Gone after delete
    let resp = client
        .delete(format!("{base}/api/items/{id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_list_sorted_by_expiry_ascending() {
    let (client, _) = registered_client().await;
    let base = base_url();

    let soon = (Utc::now() + Duration::days(1)).to_rfc3339();
    let later = (Utc::now() + Duration::days(30)).to_rfc3339();

    for (name, expiry) in [("Later", &later), ("Soon", &soon)] {
        let resp = client
            .post(format!("{base}/api/items"))
            .json(&json!({"name": name, "expiryDate": expiry}))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .get(format!("{base}/api/items"))
        .send()
        .await
        .expect("request failed");
    let items: Vec<Value> = resp.json().await.expect("not JSON");

    assert_eq!(items[0]["name"], "Soon");
    assert_eq!(items[1]["name"], "Later");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_create_requires_name() {
    let (client, _) = registered_client().await;

    let resp = client
        .post(format!("{}/api/items", base_url()))
        .json(&json!({"name": "   "}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_mutations_require_session() {
    let guest = client();
    let base = base_url();

    let resp = guest
        .post(format!("{base}/api/items"))
        .json(&json!({"name": "Milk"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Listing is tolerant: guests get an empty list, not a 401
    let resp = guest
        .get(format!("{base}/api/items"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = resp.json().await.expect("not JSON");
    assert!(items.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cross_user_access_is_404() {
    let (owner, _) = registered_client().await;
    let (intruder, _) = registered_client().await;
    let base = base_url();

    let item = create_item(&owner, "Private Cheese").await;
    let id = item["id"].as_i64().expect("item id");

    // Another user's item is indistinguishable from a missing one
    let resp = intruder
        .patch(format!("{base}/api/items/{id}"))
        .json(&json!({"name": "Stolen"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = intruder
        .delete(format!("{base}/api/items/{id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Owner still sees it
    let resp = owner
        .get(format!("{base}/api/items"))
        .send()
        .await
        .expect("request failed");
    let items: Vec<Value> = resp.json().await.expect("not JSON");
    assert!(items.iter().any(|i| i["name"] == "Private Cheese"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_notifications_check_scoped_to_session_user() {
    let (alice, _) = registered_client().await;
    let bob = client();
    let base = base_url();

    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let resp = alice
        .post(format!("{base}/api/items"))
        .json(&json!({"name": "Yogurt", "expiryDate": tomorrow}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = alice
        .get(format!("{base}/api/notifications/check"))
        .send()
        .await
        .expect("request failed");
    let body: Value = resp.json().await.expect("not JSON");
    assert!(body["count"].as_u64().expect("count") >= 1);

    // An unauthenticated caller sees nothing, not other users' items
    let resp = bob
        .get(format!("{base}/api/notifications/check"))
        .send()
        .await
        .expect("request failed");
    let body: Value = resp.json().await.expect("not JSON");
    assert_eq!(body["count"], 0);
    assert_eq!(body["items"].as_array().expect("items").len(), 0);
}
