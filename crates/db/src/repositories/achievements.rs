use async_trait::async_trait;
use eyre::Result;
use ppbot_core::models::achievement::Achievement;

use super::AchievementRepository;
use crate::models::DbAchievement;
use crate::{PgStore, to_db_id};

#[async_trait]
impl AchievementRepository for PgStore {
    async fn grant_achievement(&self, user_id: u64, achievement_id: &str) -> Result<Option<Achievement>> {
        let row = sqlx::query_as::<_, DbAchievement>(
            r#"
            WITH inserted AS (
                INSERT INTO user_achievements (user_id, achievement_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, achievement_id) DO NOTHING
                RETURNING achievement_id
            )
            SELECT a.achievement_id, a.name, a.description, a.reward_role_name
            FROM achievements a
            JOIN inserted ON inserted.achievement_id = a.achievement_id
            "#,
        )
        .bind(to_db_id(user_id))
        .bind(achievement_id)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            tracing::info!("User {} earned achievement {}", user_id, achievement_id);
        }
        Ok(row.map(Achievement::from))
    }

    async fn earned_achievements(&self, user_id: u64) -> Result<Vec<Achievement>> {
        let rows = sqlx::query_as::<_, DbAchievement>(
            r#"
            SELECT a.achievement_id, a.name, a.description, a.reward_role_name
            FROM user_achievements ua
            JOIN achievements a ON a.achievement_id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.earned_at
            "#,
        )
        .bind(to_db_id(user_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Achievement::from).collect())
    }
}
