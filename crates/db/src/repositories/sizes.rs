use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use ppbot_core::models::size::{LeaderboardEntry, SizeRecord};

use super::SizeRepository;
use crate::models::DbSize;
use crate::{PgStore, to_db_id};

#[async_trait]
impl SizeRepository for PgStore {
    async fn get_size(&self, user_id: u64) -> Result<Option<SizeRecord>> {
        let row = sqlx::query_as::<_, DbSize>(
            r#"
            SELECT user_id, size, last_roll_at
            FROM pp_sizes
            WHERE user_id = $1
            "#,
        )
        .bind(to_db_id(user_id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SizeRecord::from))
    }

    async fn save_roll(&self, user_id: u64, size: i32, rolled_at: DateTime<Utc>) -> Result<()> {
        tracing::debug!("Saving roll: user={}, size={}", user_id, size);

        sqlx::query(
            r#"
            INSERT INTO pp_sizes (user_id, size, last_roll_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET size = $2, last_roll_at = $3
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(size)
        .bind(rolled_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn shrink_size(&self, user_id: u64, amount: i32) -> Result<Option<(i32, i32)>> {
        let sizes = sqlx::query_as::<_, (i32, i32)>(
            r#"
            WITH old AS (
                SELECT user_id, size FROM pp_sizes WHERE user_id = $1 FOR UPDATE
            )
            UPDATE pp_sizes p
            SET size = GREATEST(p.size - $2, 0)
            FROM old
            WHERE p.user_id = old.user_id
            RETURNING old.size, p.size
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(amount.abs())
        .fetch_optional(&self.pool)
        .await?;

        Ok(sizes)
    }

    async fn top_sizes(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, DbSize>(
            r#"
            SELECT user_id, size, last_roll_at
            FROM pp_sizes
            ORDER BY size DESC, last_roll_at ASC NULLS LAST
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
    }

    async fn clear_sizes(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pp_sizes")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
