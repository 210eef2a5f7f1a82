use async_trait::async_trait;
use eyre::Result;

use super::CoinRepository;
use crate::{PgStore, to_db_id};

#[async_trait]
impl CoinRepository for PgStore {
    async fn balance(&self, user_id: u64) -> Result<i64> {
        let coins = sqlx::query_scalar::<_, i64>("SELECT coins FROM user_coins WHERE user_id = $1")
            .bind(to_db_id(user_id))
            .fetch_optional(&self.pool)
            .await?;

        Ok(coins.unwrap_or(0))
    }

    async fn add_coins(&self, user_id: u64, amount: i64) -> Result<i64> {
        let coins = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO user_coins (user_id, coins)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET coins = user_coins.coins + EXCLUDED.coins
            RETURNING coins
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(coins)
    }

    async fn spend_coins(&self, user_id: u64, amount: i64) -> Result<bool> {
        let remaining = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE user_coins
            SET coins = coins - $2
            WHERE user_id = $1 AND coins >= $2
            RETURNING coins
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        Ok(remaining.is_some())
    }
}
