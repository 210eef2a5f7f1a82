//! Repository traits the bot talks to. [`crate::PgStore`] implements all of
//! them against PostgreSQL; [`crate::mock::MockStore`] implements them for
//! tests.

mod achievements;
mod coins;
mod effects;
mod items;
mod sizes;
mod stats;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use ppbot_core::models::achievement::Achievement;
use ppbot_core::models::item::{ActiveEffect, EffectType, InventoryEntry, Item};
use ppbot_core::models::size::{Counter, LeaderboardEntry, SizeRecord, UserStats};

#[async_trait]
pub trait SizeRepository: Send + Sync {
    async fn get_size(&self, user_id: u64) -> Result<Option<SizeRecord>>;

    /// Upserts the user's size and roll timestamp.
    async fn save_roll(&self, user_id: u64, size: i32, rolled_at: DateTime<Utc>) -> Result<()>;

    /// Lowers a size by `amount`, not below zero. Returns `(old, new)`, or
    /// `None` when the user has no size this period.
    async fn shrink_size(&self, user_id: u64, amount: i32) -> Result<Option<(i32, i32)>>;

    /// Biggest sizes first; ties go to whoever rolled earlier.
    async fn top_sizes(&self, limit: i64) -> Result<Vec<LeaderboardEntry>>;

    /// Wipes the leaderboard. Returns how many rows were removed.
    async fn clear_sizes(&self) -> Result<u64>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn get_stats(&self, user_id: u64) -> Result<Option<UserStats>>;

    /// Counts a roll, bumping the zero/max counters when `size` hits an end
    /// of the range.
    async fn record_roll_stats(&self, user_id: u64, size: i32) -> Result<UserStats>;

    /// Adds one to `counter` and returns the new value.
    async fn increment_stat(&self, user_id: u64, counter: Counter) -> Result<i32>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Case-insensitive lookup by name.
    async fn find_item(&self, name: &str) -> Result<Option<Item>>;

    async fn inventory(&self, user_id: u64) -> Result<Vec<InventoryEntry>>;

    async fn add_item(&self, user_id: u64, item_id: i32, quantity: i32) -> Result<()>;

    /// Takes one of the item away. Returns false if the user had none.
    async fn remove_item(&self, user_id: u64, item_id: i32) -> Result<bool>;
}

#[async_trait]
pub trait EffectRepository: Send + Sync {
    async fn purge_expired_effects(&self) -> Result<u64>;

    async fn active_effect(&self, user_id: u64, effect_type: &EffectType) -> Result<Option<ActiveEffect>>;

    /// Sets (or replaces) the user's effect of this type.
    async fn apply_effect(
        &self,
        user_id: u64,
        effect_type: &EffectType,
        effect_value: i32,
        end_time: DateTime<Utc>,
    ) -> Result<()>;

    /// Removes an unexpired effect. Returns false if there was none to use.
    async fn consume_effect(&self, user_id: u64, effect_type: &EffectType) -> Result<bool>;
}

#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Records the achievement. Returns it only the first time it is earned.
    async fn grant_achievement(&self, user_id: u64, achievement_id: &str) -> Result<Option<Achievement>>;

    /// In the order they were earned.
    async fn earned_achievements(&self, user_id: u64) -> Result<Vec<Achievement>>;
}

#[async_trait]
pub trait CoinRepository: Send + Sync {
    async fn balance(&self, user_id: u64) -> Result<i64>;

    /// Credits coins and returns the new balance.
    async fn add_coins(&self, user_id: u64, amount: i64) -> Result<i64>;

    /// Debits coins only if the balance covers it. Returns false otherwise.
    async fn spend_coins(&self, user_id: u64, amount: i64) -> Result<bool>;
}

/// Everything the bot needs from storage.
pub trait Store:
    SizeRepository
    + StatsRepository
    + ItemRepository
    + EffectRepository
    + AchievementRepository
    + CoinRepository
    + 'static
{
}

impl<T> Store for T where
    T: SizeRepository
        + StatsRepository
        + ItemRepository
        + EffectRepository
        + AchievementRepository
        + CoinRepository
        + 'static
{
}
