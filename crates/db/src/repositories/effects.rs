use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use ppbot_core::models::item::{ActiveEffect, EffectType};

use super::EffectRepository;
use crate::models::DbActiveEffect;
use crate::{PgStore, to_db_id};

#[async_trait]
impl EffectRepository for PgStore {
    async fn purge_expired_effects(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_active_effects WHERE end_time <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn active_effect(&self, user_id: u64, effect_type: &EffectType) -> Result<Option<ActiveEffect>> {
        let row = sqlx::query_as::<_, DbActiveEffect>(
            r#"
            SELECT user_id, effect_type, effect_value, end_time
            FROM user_active_effects
            WHERE user_id = $1 AND effect_type = $2 AND end_time > NOW()
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(effect_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ActiveEffect::from))
    }

    async fn apply_effect(
        &self,
        user_id: u64,
        effect_type: &EffectType,
        effect_value: i32,
        end_time: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_active_effects (user_id, effect_type, effect_value, end_time)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, effect_type)
            DO UPDATE SET effect_value = $3, end_time = $4
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(effect_type.as_str())
        .bind(effect_value)
        .bind(end_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume_effect(&self, user_id: u64, effect_type: &EffectType) -> Result<bool> {
        let consumed = sqlx::query_scalar::<_, i64>(
            r#"
            DELETE FROM user_active_effects
            WHERE user_id = $1 AND effect_type = $2 AND end_time > NOW()
            RETURNING user_id
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(effect_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(consumed.is_some())
    }
}
