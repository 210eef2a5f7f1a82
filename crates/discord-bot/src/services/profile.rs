use eyre::Result;
use ppbot_core::models::achievement::Achievement;
use ppbot_core::models::size::{SizeRecord, UserStats};
use ppbot_db::{AchievementRepository, CoinRepository, SizeRepository, StatsRepository, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: u64,
    pub size: Option<SizeRecord>,
    pub stats: UserStats,
    pub coins: i64,
    pub achievements: Vec<Achievement>,
}

pub async fn load_profile<S: Store + ?Sized>(store: &S, user_id: u64) -> Result<Profile> {
    let size = store.get_size(user_id).await?;
    let stats = store.get_stats(user_id).await?.unwrap_or(UserStats {
        user_id,
        ..UserStats::default()
    });
    let coins = store.balance(user_id).await?;
    let achievements = store.earned_achievements(user_id).await?;

    Ok(Profile {
        user_id,
        size,
        stats,
        coins,
        achievements,
    })
}
