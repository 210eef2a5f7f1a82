use async_trait::async_trait;
use eyre::Result;
use ppbot_core::models::item::{InventoryEntry, Item};

use super::ItemRepository;
use crate::models::{DbInventoryEntry, DbItem};
use crate::{PgStore, to_db_id};

#[async_trait]
impl ItemRepository for PgStore {
    async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query_as::<_, DbItem>(
            r#"
            SELECT item_id, name, description, effect_type, effect_value, duration_minutes, usable, price
            FROM items
            ORDER BY item_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find_item(&self, name: &str) -> Result<Option<Item>> {
        let row = sqlx::query_as::<_, DbItem>(
            r#"
            SELECT item_id, name, description, effect_type, effect_value, duration_minutes, usable, price
            FROM items
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn inventory(&self, user_id: u64) -> Result<Vec<InventoryEntry>> {
        let rows = sqlx::query_as::<_, DbInventoryEntry>(
            r#"
            SELECT i.item_id, i.name, i.description, inv.quantity
            FROM user_inventory inv
            JOIN items i ON i.item_id = inv.item_id
            WHERE inv.user_id = $1 AND inv.quantity > 0
            ORDER BY i.name
            "#,
        )
        .bind(to_db_id(user_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InventoryEntry::from).collect())
    }

    async fn add_item(&self, user_id: u64, item_id: i32, quantity: i32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_inventory (user_id, item_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET quantity = user_inventory.quantity + EXCLUDED.quantity
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(item_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_item(&self, user_id: u64, item_id: i32) -> Result<bool> {
        let remaining = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE user_inventory
            SET quantity = quantity - 1
            WHERE user_id = $1 AND item_id = $2 AND quantity > 0
            RETURNING quantity
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        match remaining {
            Some(0) => {
                sqlx::query(
                    "DELETE FROM user_inventory WHERE user_id = $1 AND item_id = $2 AND quantity = 0",
                )
                .bind(to_db_id(user_id))
                .bind(item_id)
                .execute(&self.pool)
                .await?;
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }
}
