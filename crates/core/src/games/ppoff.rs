use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::errors::{BotError, BotResult};

pub const DEFAULT_MINUTES: i64 = 1;
pub const MAX_MINUTES: i64 = 60;
/// How many scores the results embed lists.
pub const STANDINGS_SHOWN: usize = 10;

/// A timed contest: best roll in one channel wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpOff {
    pub channel_id: u64,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    scores: HashMap<u64, i32>,
}

impl PpOff {
    pub fn start(channel_id: u64, minutes: i64, now: DateTime<Utc>) -> BotResult<Self> {
        if !(1..=MAX_MINUTES).contains(&minutes) {
            return Err(BotError::Validation(format!(
                "Please specify a duration between 1 and {MAX_MINUTES} minutes."
            )));
        }

        Ok(Self {
            channel_id,
            started_at: now,
            ends_at: now + Duration::minutes(minutes),
            scores: HashMap::new(),
        })
    }

    pub fn is_running_in(&self, channel_id: u64, now: DateTime<Utc>) -> bool {
        self.channel_id == channel_id && now < self.ends_at
    }

    /// Keeps the user's best score. Returns true if this was a new best.
    pub fn record(&mut self, user_id: u64, score: i32) -> bool {
        let best = self.scores.entry(user_id).or_insert(i32::MIN);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    pub fn participants(&self) -> usize {
        self.scores.len()
    }

    /// Scores from best to worst. Ties keep the lower user id first so the
    /// order is stable.
    pub fn standings(&self) -> Vec<(u64, i32)> {
        let mut standings: Vec<(u64, i32)> = self.scores.iter().map(|(user, score)| (*user, *score)).collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        standings
    }

    pub fn winner(&self) -> Option<(u64, i32)> {
        self.standings().first().copied()
    }
}
