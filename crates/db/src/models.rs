use chrono::{DateTime, Utc};
use ppbot_core::models::achievement::Achievement;
use ppbot_core::models::item::{ActiveEffect, EffectType, InventoryEntry, Item};
use ppbot_core::models::size::{LeaderboardEntry, SizeRecord, UserStats};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::from_db_id;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSize {
    pub user_id: i64,
    pub size: i32,
    pub last_roll_at: Option<DateTime<Utc>>,
}

impl From<DbSize> for SizeRecord {
    fn from(row: DbSize) -> Self {
        Self {
            user_id: from_db_id(row.user_id),
            size: row.size,
            last_roll_at: row.last_roll_at,
        }
    }
}

impl From<DbSize> for LeaderboardEntry {
    fn from(row: DbSize) -> Self {
        Self {
            user_id: from_db_id(row.user_id),
            size: row.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserStats {
    pub user_id: i64,
    pub total_rolls: i32,
    pub zero_rolls: i32,
    pub max_rolls: i32,
    pub duel_wins: i32,
    pub trivia_wins: i32,
    pub days_as_title_holder: i32,
}

impl From<DbUserStats> for UserStats {
    fn from(row: DbUserStats) -> Self {
        Self {
            user_id: from_db_id(row.user_id),
            total_rolls: row.total_rolls,
            zero_rolls: row.zero_rolls,
            max_rolls: row.max_rolls,
            duel_wins: row.duel_wins,
            trivia_wins: row.trivia_wins,
            days_as_title_holder: row.days_as_title_holder,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbItem {
    pub item_id: i32,
    pub name: String,
    pub description: String,
    pub effect_type: String,
    pub effect_value: i32,
    pub duration_minutes: i32,
    pub usable: bool,
    pub price: Option<i64>,
}

impl From<DbItem> for Item {
    fn from(row: DbItem) -> Self {
        Self {
            item_id: row.item_id,
            name: row.name,
            description: row.description,
            effect_type: parse_effect(&row.effect_type),
            effect_value: row.effect_value,
            duration_minutes: row.duration_minutes,
            usable: row.usable,
            price: row.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbInventoryEntry {
    pub item_id: i32,
    pub name: String,
    pub description: String,
    pub quantity: i32,
}

impl From<DbInventoryEntry> for InventoryEntry {
    fn from(row: DbInventoryEntry) -> Self {
        Self {
            item_id: row.item_id,
            name: row.name,
            description: row.description,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbActiveEffect {
    pub user_id: i64,
    pub effect_type: String,
    pub effect_value: i32,
    pub end_time: DateTime<Utc>,
}

impl From<DbActiveEffect> for ActiveEffect {
    fn from(row: DbActiveEffect) -> Self {
        Self {
            user_id: from_db_id(row.user_id),
            effect_type: parse_effect(&row.effect_type),
            effect_value: row.effect_value,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAchievement {
    pub achievement_id: String,
    pub name: String,
    pub description: String,
    pub reward_role_name: Option<String>,
}

impl From<DbAchievement> for Achievement {
    fn from(row: DbAchievement) -> Self {
        Self {
            id: row.achievement_id,
            name: row.name,
            description: row.description,
            reward_role_name: row.reward_role_name,
        }
    }
}

fn parse_effect(text: &str) -> EffectType {
    match text.parse() {
        Ok(effect) => effect,
        Err(never) => match never {},
    }
}
