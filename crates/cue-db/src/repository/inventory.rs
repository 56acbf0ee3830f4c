//! # Inventory Repository
//!
//! Database operations for the inventory ledger: the club's price list of
//! drinks, snacks and supplies.
//!
//! Billing only ever reads from here. A session line snapshots the selling
//! price when the item is first added, so later price edits never reach an
//! existing line.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cue_core::validation::{validate_inventory_item_update, validate_new_inventory_item};
use cue_core::{InventoryItem, InventoryItemUpdate, NewInventoryItem};

const INVENTORY_COLUMNS: &str =
    "id, item_name, selling_price_cents, margin_cents, is_active, created_at, updated_at";

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets an item by ID, active or not.
    pub async fn get(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_item(&mut conn, id).await
    }

    /// Gets an item by its exact name.
    pub async fn get_by_name(&self, item_name: &str) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory_items WHERE item_name = ?");
        let item = sqlx::query_as(&sql)
            .bind(item_name.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Lists items alphabetically.
    pub async fn list(&self, skip: i64, limit: i64, active_only: bool) -> DbResult<Vec<InventoryItem>> {
        let filter = if active_only { "WHERE is_active = 1" } else { "" };
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_items {filter} \
             ORDER BY item_name LIMIT ? OFFSET ?"
        );
        let items: Vec<InventoryItem> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), active_only, "Listed inventory items");
        Ok(items)
    }

    /// Returns total count of active items.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Creates an item. Names are unique across the ledger.
    pub async fn create(&self, input: &NewInventoryItem) -> DbResult<InventoryItem> {
        validate_new_inventory_item(input)?;

        let item_name = input.item_name.trim().to_string();
        if self.get_by_name(&item_name).await?.is_some() {
            return Err(DbError::duplicate("item_name", item_name));
        }

        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            item_name,
            selling_price_cents: input.selling_price_cents,
            margin_cents: input.margin_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, item_name, selling_price_cents, margin_cents, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.item_name)
        .bind(item.selling_price_cents)
        .bind(item.margin_cents)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %item.id, item_name = %item.item_name, price_cents = item.selling_price_cents, "Inventory item created");
        Ok(item)
    }

    /// Applies a partial update. Existing session lines keep their snapshot price.
    pub async fn update(&self, id: &str, changes: &InventoryItemUpdate) -> DbResult<InventoryItem> {
        validate_inventory_item_update(changes)?;

        let mut item = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))?;

        if let Some(name) = &changes.item_name {
            let name = name.trim().to_string();
            if name != item.item_name {
                if self.get_by_name(&name).await?.is_some() {
                    return Err(DbError::duplicate("item_name", name));
                }
                item.item_name = name;
            }
        }
        if let Some(price) = changes.selling_price_cents {
            item.selling_price_cents = price;
        }
        if let Some(margin) = changes.margin_cents {
            item.margin_cents = margin;
        }
        if let Some(active) = changes.is_active {
            item.is_active = active;
        }
        item.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE inventory_items
            SET item_name = ?, selling_price_cents = ?, margin_cents = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.item_name)
        .bind(item.selling_price_cents)
        .bind(item.margin_cents)
        .bind(item.is_active)
        .bind(item.updated_at)
        .bind(&item.id)
        .execute(&self.pool)
        .await?;

        debug!(id = %item.id, "Inventory item updated");
        Ok(item)
    }

    /// Soft delete: the item stays for historical lines but can't be billed.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE inventory_items SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }
        info!(id = %id, "Inventory item deactivated");
        Ok(())
    }

    /// Permanent delete.
    ///
    /// Fails with `ForeignKeyViolation` while any session line references the item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }
        info!(id = %id, "Inventory item deleted");
        Ok(())
    }
}

pub(crate) async fn fetch_item(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<InventoryItem>> {
    let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory_items WHERE id = ?");
    let item = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
    Ok(item)
}
