//! Item repository for database operations.
//!
//! Every mutating query is scoped by owner in the WHERE clause, so an
//! ownership mismatch and a missing row are indistinguishable: both surface
//! as `NotFound`. That is deliberate; the API must not reveal whether
//! another user's item exists.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use freshtrack_core::{ItemId, ItemStatus, UserId};

use super::RepositoryError;
use crate::models::Item;

/// Fields for creating a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub expiry_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Database row for an item.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    category: String,
    quantity: i32,
    expiry_date: Option<DateTime<Utc>>,
    status: String,
    image_url: Option<String>,
    owner_id: i32,
    added_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_domain(self) -> Result<Item, RepositoryError> {
        let status: ItemStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid item status in database: {e}"))
        })?;

        Ok(Item {
            id: ItemId::new(self.id),
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            status,
            image_url: self.image_url,
            owner_id: UserId::new(self.owner_id),
            added_at: self.added_at,
        })
    }
}

const ITEM_COLUMNS: &str =
    "id, name, category, quantity, expiry_date, status, image_url, owner_id, added_at";

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new item owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewItem, owner_id: UserId) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            INSERT INTO items (name, category, quantity, expiry_date, status, image_url, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            ",
        ))
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.quantity)
        .bind(new.expiry_date)
        .bind(ItemStatus::Available.to_string())
        .bind(&new.image_url)
        .bind(owner_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// List all items for an owner, ordered ascending by expiry date.
    ///
    /// `NULL` expiry dates sort last per Postgres default ASC ordering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, owner_id: UserId) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            SELECT {ITEM_COLUMNS}
            FROM items
            WHERE owner_id = $1
            ORDER BY expiry_date ASC
            ",
        ))
        .bind(owner_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ItemRow::into_domain).collect()
    }

    /// Apply a partial update to an item owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item with that id is owned
    /// by `owner_id` (missing and not-yours are indistinguishable).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ItemId,
        owner_id: UserId,
        update: ItemUpdate,
    ) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            UPDATE items
            SET name = COALESCE($3, name),
                category = COALESCE($4, category),
                expiry_date = COALESCE($5, expiry_date)
            WHERE id = $1 AND owner_id = $2
            RETURNING {ITEM_COLUMNS}
            ",
        ))
        .bind(id.as_i32())
        .bind(owner_id.as_i32())
        .bind(&update.name)
        .bind(&update.category)
        .bind(update.expiry_date)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_domain()
    }

    /// Delete an item owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item with that id is owned
    /// by `owner_id`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ItemId, owner_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM items
            WHERE id = $1 AND owner_id = $2
            ",
        )
        .bind(id.as_i32())
        .bind(owner_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List available items for an owner with an expiry date at or before
    /// `cutoff`, for the notifications check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn expiring_before(
        &self,
        owner_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            SELECT {ITEM_COLUMNS}
            FROM items
            WHERE owner_id = $1
              AND status = $2
              AND expiry_date IS NOT NULL
              AND expiry_date <= $3
            ORDER BY expiry_date ASC
            ",
        ))
        .bind(owner_id.as_i32())
        .bind(ItemStatus::Available.to_string())
        .bind(cutoff)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ItemRow::into_domain).collect()
    }
}
