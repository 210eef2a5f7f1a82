use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::roll::{MAX_SIZE, MIN_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    RollAZero,
    RollATwenty,
    BecameTitleHolder,
    FirstDuelWin,
    TenDuelWins,
    FirstTriviaWin,
    TenTriviaWins,
}

impl AchievementId {
    pub const ALL: [AchievementId; 7] = [
        AchievementId::RollAZero,
        AchievementId::RollATwenty,
        AchievementId::BecameTitleHolder,
        AchievementId::FirstDuelWin,
        AchievementId::TenDuelWins,
        AchievementId::FirstTriviaWin,
        AchievementId::TenTriviaWins,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::RollAZero => "roll_a_zero",
            AchievementId::RollATwenty => "roll_a_twenty",
            AchievementId::BecameTitleHolder => "became_title_holder",
            AchievementId::FirstDuelWin => "first_duel_win",
            AchievementId::TenDuelWins => "ten_duel_wins",
            AchievementId::FirstTriviaWin => "first_win_trivia",
            AchievementId::TenTriviaWins => "ten_wins_trivia",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AchievementId::RollAZero => "Rock Bottom",
            AchievementId::RollATwenty => "Maxed Out",
            AchievementId::BecameTitleHolder => "Title Holder",
            AchievementId::FirstDuelWin => "Duelist",
            AchievementId::TenDuelWins => "Duel Master",
            AchievementId::FirstTriviaWin => "Trivia Novice",
            AchievementId::TenTriviaWins => "Trivia Master",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AchievementId::RollAZero => "Rolled a 0 for the first time",
            AchievementId::RollATwenty => "Rolled a 20 for the first time",
            AchievementId::BecameTitleHolder => "Topped the leaderboard when it reset",
            AchievementId::FirstDuelWin => "Won your first duel",
            AchievementId::TenDuelWins => "Won 10 duels",
            AchievementId::FirstTriviaWin => "Won your first trivia question",
            AchievementId::TenTriviaWins => "Won 10 trivia questions",
        }
    }

    /// Achievement unlocked by rolling exactly `size`, if any.
    pub fn for_roll(size: i32) -> Option<AchievementId> {
        match size {
            MIN_SIZE => Some(AchievementId::RollAZero),
            MAX_SIZE => Some(AchievementId::RollATwenty),
            _ => None,
        }
    }

    /// Achievement unlocked when duel wins reach `wins`.
    pub fn for_duel_wins(wins: i32) -> Option<AchievementId> {
        match wins {
            1 => Some(AchievementId::FirstDuelWin),
            10 => Some(AchievementId::TenDuelWins),
            _ => None,
        }
    }

    /// Achievement unlocked when trivia wins reach `wins`.
    pub fn for_trivia_wins(wins: i32) -> Option<AchievementId> {
        match wins {
            1 => Some(AchievementId::FirstTriviaWin),
            10 => Some(AchievementId::TenTriviaWins),
            _ => None,
        }
    }
}

impl FromStr for AchievementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown achievement id: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub reward_role_name: Option<String>,
}

impl From<AchievementId> for Achievement {
    fn from(id: AchievementId) -> Self {
        Self {
            id: id.as_str().to_string(),
            name: id.name().to_string(),
            description: id.description().to_string(),
            reward_role_name: None,
        }
    }
}

/// Rows used to seed an empty `achievements` table.
pub fn achievement_catalog() -> Vec<Achievement> {
    AchievementId::ALL.into_iter().map(Achievement::from).collect()
}
