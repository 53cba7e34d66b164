//! Inventory item route handlers.
//!
//! All mutations require a session and are scoped to the session user at
//! the query level. Listing is tolerant of guests: an unauthenticated call
//! gets an empty list rather than a 401, so the UI can render before login.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use freshtrack_core::ItemId;

use crate::db::items::{ItemRepository, ItemUpdate, NewItem};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::Item;
use crate::state::AppState;

/// Item creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Partial item update request body. Absent fields are left unchanged;
/// explicit `null` is treated the same as absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// List the session user's items, soonest expiry first.
pub async fn list(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Vec<Item>>> {
    let Some(user) = user else {
        return Ok(Json(Vec::new()));
    };

    let items = ItemRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(items))
}

/// Create an item owned by the session user.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateItemRequest>,
) -> Result<Json<Item>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Item name is required".to_owned()));
    }

    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    let item = ItemRepository::new(state.pool())
        .create(
            NewItem {
                name: name.to_owned(),
                category: freshtrack_core::normalize_category(body.category.as_deref()),
                quantity,
                expiry_date: body.expiry_date,
                image_url: None,
            },
            user.id,
        )
        .await?;

    tracing::info!(item_id = %item.id, "Item created");
    Ok(Json(item))
}

/// Apply a partial update to an owned item.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Item>> {
    if let Some(name) = &body.name
        && name.trim().is_empty()
    {
        return Err(AppError::Validation("Item name cannot be empty".to_owned()));
    }

    let item = ItemRepository::new(state.pool())
        .update(
            id,
            user.id,
            ItemUpdate {
                name: body.name.map(|n| n.trim().to_owned()),
                category: body.category,
                expiry_date: body.expiry_date,
            },
        )
        .await?;

    Ok(Json(item))
}

/// Delete an owned item.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ItemId>,
) -> Result<impl IntoResponse> {
    ItemRepository::new(state.pool()).delete(id, user.id).await?;

    tracing::info!(item_id = %id, "Item deleted");
    Ok(Json(json!({ "success": true })))
}
