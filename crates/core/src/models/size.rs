use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's current leaderboard size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRecord {
    pub user_id: u64,
    pub size: i32,
    pub last_roll_at: Option<DateTime<Utc>>,
}

/// One row of the leaderboard, already ordered by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: u64,
    pub size: i32,
}

/// Lifetime counters kept per user. None of these are touched by the reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: u64,
    pub total_rolls: i32,
    pub zero_rolls: i32,
    pub max_rolls: i32,
    pub duel_wins: i32,
    pub trivia_wins: i32,
    pub days_as_title_holder: i32,
}

/// Counters that are bumped one at a time by game outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    DuelWins,
    TriviaWins,
    DaysAsTitleHolder,
}

impl Counter {
    pub fn column(self) -> &'static str {
        match self {
            Counter::DuelWins => "duel_wins",
            Counter::TriviaWins => "trivia_wins",
            Counter::DaysAsTitleHolder => "days_as_title_holder",
        }
    }
}
