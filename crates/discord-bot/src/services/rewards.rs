use eyre::Result;
use ppbot_core::models::achievement::{Achievement, AchievementId};
use ppbot_core::models::item::Item;
use ppbot_core::models::size::Counter;
use ppbot_core::rewards::{GAME_COIN_REWARD, Rarity, pick_reward};
use ppbot_db::{AchievementRepository, CoinRepository, ItemRepository, StatsRepository, Store};
use rand::Rng;
use tracing::info;

/// Records an achievement, returning it only the first time.
pub async fn grant<S: Store + ?Sized>(store: &S, user_id: u64, id: AchievementId) -> Result<Option<Achievement>> {
    store.grant_achievement(user_id, id.as_str()).await
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReward {
    pub coins: i64,
    pub balance: i64,
    pub item: Option<(Item, Rarity)>,
}

/// Pays the standard minigame prize: coins plus one weighted random item.
pub async fn pay_game_reward<S, R>(store: &S, user_id: u64, rng: &mut R) -> Result<GameReward>
where
    S: Store + ?Sized,
    R: Rng + Send + ?Sized,
{
    let balance = store.add_coins(user_id, GAME_COIN_REWARD).await?;

    let catalog = store.list_items().await?;
    let item = pick_reward(&catalog, rng).cloned();
    if let Some(item) = &item {
        store.add_item(user_id, item.item_id, 1).await?;
        info!("User {} won a {} as a game reward", user_id, item.name);
    }

    Ok(GameReward {
        coins: GAME_COIN_REWARD,
        balance,
        item: item.map(|item| {
            let rarity = Rarity::of(&item);
            (item, rarity)
        }),
    })
}

/// A bumped win counter and the achievement it unlocked, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinRecord {
    pub wins: i32,
    pub achievement: Option<Achievement>,
}

pub async fn record_duel_win<S: Store + ?Sized>(store: &S, user_id: u64) -> Result<WinRecord> {
    let wins = store.increment_stat(user_id, Counter::DuelWins).await?;
    let achievement = match AchievementId::for_duel_wins(wins) {
        Some(id) => grant(store, user_id, id).await?,
        None => None,
    };
    Ok(WinRecord { wins, achievement })
}

pub async fn record_trivia_win<S: Store + ?Sized>(store: &S, user_id: u64) -> Result<WinRecord> {
    let wins = store.increment_stat(user_id, Counter::TriviaWins).await?;
    let achievement = match AchievementId::for_trivia_wins(wins) {
        Some(id) => grant(store, user_id, id).await?,
        None => None,
    };
    Ok(WinRecord { wins, achievement })
}
