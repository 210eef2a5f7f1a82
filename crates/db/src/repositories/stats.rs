use async_trait::async_trait;
use eyre::Result;
use ppbot_core::models::size::{Counter, UserStats};
use ppbot_core::roll::{MAX_SIZE, MIN_SIZE};

use super::StatsRepository;
use crate::models::DbUserStats;
use crate::{PgStore, to_db_id};

#[async_trait]
impl StatsRepository for PgStore {
    async fn get_stats(&self, user_id: u64) -> Result<Option<UserStats>> {
        let row = sqlx::query_as::<_, DbUserStats>(
            r#"
            SELECT user_id, total_rolls, zero_rolls, max_rolls, duel_wins, trivia_wins, days_as_title_holder
            FROM user_stats
            WHERE user_id = $1
            "#,
        )
        .bind(to_db_id(user_id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserStats::from))
    }

    async fn record_roll_stats(&self, user_id: u64, size: i32) -> Result<UserStats> {
        let zero = i32::from(size == MIN_SIZE);
        let max = i32::from(size == MAX_SIZE);

        let row = sqlx::query_as::<_, DbUserStats>(
            r#"
            INSERT INTO user_stats (user_id, total_rolls, zero_rolls, max_rolls)
            VALUES ($1, 1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
                total_rolls = user_stats.total_rolls + 1,
                zero_rolls = user_stats.zero_rolls + EXCLUDED.zero_rolls,
                max_rolls = user_stats.max_rolls + EXCLUDED.max_rolls
            RETURNING user_id, total_rolls, zero_rolls, max_rolls, duel_wins, trivia_wins, days_as_title_holder
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(zero)
        .bind(max)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn increment_stat(&self, user_id: u64, counter: Counter) -> Result<i32> {
        // Column names come from a closed enum, never from user input.
        let column = counter.column();
        let query = format!(
            r#"
            INSERT INTO user_stats (user_id, {column})
            VALUES ($1, 1)
            ON CONFLICT (user_id)
            DO UPDATE SET {column} = user_stats.{column} + 1
            RETURNING {column}
            "#
        );

        let value = sqlx::query_scalar::<_, i32>(&query)
            .bind(to_db_id(user_id))
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Incremented {} for user {} to {}", column, user_id, value);
        Ok(value)
    }
}
