use eyre::Result;
use ppbot_core::models::achievement::{Achievement, AchievementId};
use ppbot_core::models::size::Counter;
use ppbot_db::{SizeRepository, StatsRepository, Store};
use tracing::info;

use super::rewards::grant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Champion {
    pub user_id: u64,
    pub size: i32,
    pub days_as_title_holder: i32,
    pub achievement: Option<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetSummary {
    pub champion: Option<Champion>,
    pub cleared: u64,
}

/// Credits the current leader, then wipes the leaderboard.
pub async fn run_reset<S: Store + ?Sized>(store: &S) -> Result<ResetSummary> {
    let leader = store.top_sizes(1).await?.into_iter().next();

    let champion = match leader {
        Some(entry) => {
            let days = store.increment_stat(entry.user_id, Counter::DaysAsTitleHolder).await?;
            let achievement = grant(store, entry.user_id, AchievementId::BecameTitleHolder).await?;
            info!("User {} held the title with size {}", entry.user_id, entry.size);
            Some(Champion {
                user_id: entry.user_id,
                size: entry.size,
                days_as_title_holder: days,
                achievement,
            })
        }
        None => None,
    };

    let cleared = store.clear_sizes().await?;
    info!("Leaderboard reset, {} sizes cleared", cleared);

    Ok(ResetSummary { champion, cleared })
}
