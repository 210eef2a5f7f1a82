use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, DurationRound, Utc};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

pub const MIN_SIZE: i32 = 0;
pub const MAX_SIZE: i32 = 20;

/// Relative weight of each size, index = size.
pub const SIZE_WEIGHTS: [u32; 21] = [
    1, 2, 3, 5, 7, 10, 15, 18, 20, 25, // 0-9
    30, 30, 25, 20, 15, 10, 7, 5, 3, 2, // 10-19
    1, // 20
];

static SIZE_DISTRIBUTION: LazyLock<WeightedIndex<u32>> =
    LazyLock::new(|| WeightedIndex::new(SIZE_WEIGHTS).expect("size weights are positive"));

/// Draws one base size from the weighted table.
pub fn draw_size<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    SIZE_DISTRIBUTION.sample(rng) as i32
}

pub fn clamp_size(size: i32) -> i32 {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

/// Transient modifiers applied on top of the base draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollModifiers {
    /// Active server event: name and additive effect.
    pub event: Option<(String, i32)>,
    /// Additive bonus from an active size boost item.
    pub item_boost: i32,
    /// Extra draws from a luck item; the best draw is kept.
    pub extra_draws: u32,
}

impl RollModifiers {
    pub fn additive(&self) -> i32 {
        self.event.as_ref().map_or(0, |(_, effect)| *effect) + self.item_boost
    }

    /// Human readable list of what changed the roll, e.g. `+2 from Heat Wave`.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some((name, effect)) = &self.event {
            if *effect != 0 {
                labels.push(format!("{} from {name}", signed(*effect)));
            }
        }
        if self.item_boost != 0 {
            labels.push(format!("{} from Growth Potion", signed(self.item_boost)));
        }
        if self.extra_draws > 0 {
            labels.push(format!("best of {} from Lucky Socks", self.extra_draws + 1));
        }
        labels
    }
}

fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roll {
    pub base: i32,
    pub size: i32,
}

/// Draws a base size (best of `1 + extra_draws`) and applies the additive
/// modifiers, clamped to the size range.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, modifiers: &RollModifiers) -> Roll {
    let base = (0..=modifiers.extra_draws)
        .map(|_| draw_size(rng))
        .max()
        .unwrap_or(MIN_SIZE);

    Roll {
        base,
        size: clamp_size(base + modifiers.additive()),
    }
}

/// `8====D` style bar for a size.
pub fn size_bar(size: i32) -> String {
    format!("8{}D", "=".repeat(size.max(0) as usize))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollAvailability {
    Ready,
    CoolingDown {
        next_roll_at: DateTime<Utc>,
        remaining: Duration,
    },
}

/// One roll per UTC clock hour.
pub fn roll_availability(last_roll_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> RollAvailability {
    let Some(last) = last_roll_at else {
        return RollAvailability::Ready;
    };

    let current_hour = start_of_hour(now);
    if start_of_hour(last) != current_hour {
        return RollAvailability::Ready;
    }

    let next_roll_at = current_hour + Duration::hours(1);
    RollAvailability::CoolingDown {
        next_roll_at,
        remaining: next_roll_at - now,
    }
}

pub fn start_of_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::hours(1)).unwrap_or(at)
}

/// Formats a remaining duration as `12m 5s`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{}m {}s", total / 60, total % 60)
}

/// Seconds a user has to answer a reroll prompt.
pub const REROLL_PROMPT_SECONDS: i64 = 30;

/// A roll waiting on the user's yes/no answer to a reroll prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReroll {
    pub first: Roll,
    pub modifiers: RollModifiers,
    pub channel_id: u64,
    pub guild_id: u64,
    /// When the roll was made. The final roll is saved with this time so the
    /// prompt never spills into the next hour's cooldown.
    pub rolled_at: DateTime<Utc>,
    pub prompted_at: DateTime<Utc>,
    /// Set when the roll was made during a roll-off in this channel.
    pub in_roll_off: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerollAnswer {
    Yes,
    No,
}

impl RerollAnswer {
    pub fn parse(content: &str) -> Option<Self> {
        match content.trim().to_lowercase().as_str() {
            "yes" => Some(RerollAnswer::Yes),
            "no" => Some(RerollAnswer::No),
            _ => None,
        }
    }
}

/// Open reroll prompts, at most one per user across all channels.
#[derive(Debug, Default)]
pub struct RerollBook {
    prompts: HashMap<u64, PendingReroll>,
}

impl RerollBook {
    /// Whether the user has a prompt open anywhere.
    pub fn contains(&self, user_id: u64) -> bool {
        self.prompts.contains_key(&user_id)
    }

    /// Registers a prompt unless the user already has one open.
    pub fn open(&mut self, user_id: u64, pending: PendingReroll) -> bool {
        match self.prompts.entry(user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(pending);
                true
            }
        }
    }

    /// Takes the user's prompt if it was opened in `channel_id`.
    pub fn take(&mut self, channel_id: u64, user_id: u64) -> Option<PendingReroll> {
        match self.prompts.get(&user_id) {
            Some(pending) if pending.channel_id == channel_id => self.prompts.remove(&user_id),
            _ => None,
        }
    }

    /// Removes the prompt only if it is the one opened at `prompted_at`.
    pub fn expire(&mut self, user_id: u64, prompted_at: DateTime<Utc>) -> Option<PendingReroll> {
        match self.prompts.get(&user_id) {
            Some(pending) if pending.prompted_at == prompted_at => self.prompts.remove(&user_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let size = draw_size(&mut rng);
            assert!((MIN_SIZE..=MAX_SIZE).contains(&size));
        }
    }

    #[test]
    fn modifiers_are_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let huge = RollModifiers {
            event: Some(("Heat Wave".to_string(), 2)),
            item_boost: 40,
            extra_draws: 0,
        };
        assert_eq!(roll(&mut rng, &huge).size, MAX_SIZE);

        let tiny = RollModifiers {
            event: Some(("Cold Snap".to_string(), -2)),
            item_boost: -40,
            extra_draws: 0,
        };
        assert_eq!(roll(&mut rng, &tiny).size, MIN_SIZE);
    }

    #[test]
    fn cooldown_is_per_clock_hour() {
        let last = Utc.with_ymd_and_hms(2024, 5, 1, 10, 59, 0).unwrap();
        let same_hour = Utc.with_ymd_and_hms(2024, 5, 1, 10, 59, 30).unwrap();
        let next_hour = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 1).unwrap();

        assert_eq!(
            roll_availability(Some(last), same_hour),
            RollAvailability::CoolingDown {
                next_roll_at: Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
                remaining: Duration::seconds(30),
            }
        );
        assert_eq!(roll_availability(Some(last), next_hour), RollAvailability::Ready);
        assert_eq!(roll_availability(None, same_hour), RollAvailability::Ready);
    }
}
