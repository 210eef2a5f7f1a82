use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use ppbot_core::models::achievement::{Achievement, AchievementId};
use ppbot_core::models::item::EffectType;
use ppbot_core::models::size::UserStats;
use ppbot_core::roll::{self, Roll, RollAvailability, RollModifiers, draw_size, roll_availability};
use ppbot_db::{CoinRepository, EffectRepository, SizeRepository, StatsRepository, Store};
use rand::Rng;

use super::rewards::grant;

/// What happened when a user asked to roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollStart {
    CoolingDown {
        next_roll_at: DateTime<Utc>,
        remaining: Duration,
    },
    Rolled {
        roll: Roll,
        modifiers: RollModifiers,
        /// A reroll token was armed and has been spent on this roll.
        reroll_offered: bool,
    },
}

/// Checks the cooldown, gathers item and event modifiers and draws.
///
/// Single-use effects (luck, reroll) are consumed here, before the user sees
/// the result. A plain roll is saved by [`commit_roll`]. When a reroll is
/// offered the first roll is saved right away so the hour stays taken while
/// the prompt is open.
pub async fn start_roll<S, R>(
    store: &S,
    user_id: u64,
    now: DateTime<Utc>,
    event: Option<(String, i32)>,
    in_roll_off: bool,
    rng: &mut R,
) -> Result<RollStart>
where
    S: Store + ?Sized,
    R: Rng + Send + ?Sized,
{
    if !in_roll_off {
        let last_roll_at = store.get_size(user_id).await?.and_then(|record| record.last_roll_at);
        if let RollAvailability::CoolingDown { next_roll_at, remaining } = roll_availability(last_roll_at, now) {
            return Ok(RollStart::CoolingDown { next_roll_at, remaining });
        }
    }

    let item_boost = store
        .active_effect(user_id, &EffectType::SizeBoost)
        .await?
        .map_or(0, |effect| effect.effect_value);

    let mut extra_draws = 0;
    if let Some(luck) = store.active_effect(user_id, &EffectType::LuckBoost).await? {
        if store.consume_effect(user_id, &EffectType::LuckBoost).await? {
            extra_draws = luck.effect_value.max(0) as u32;
        }
    }

    let reroll_offered = store.consume_effect(user_id, &EffectType::RerollAvailable).await?;

    let modifiers = RollModifiers {
        event,
        item_boost,
        extra_draws,
    };
    let roll = roll::roll(rng, &modifiers);

    if reroll_offered {
        store.save_roll(user_id, roll.size, now).await?;
    }

    Ok(RollStart::Rolled {
        roll,
        modifiers,
        reroll_offered,
    })
}

/// The persisted result of a roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollCommit {
    pub size: i32,
    pub coins_earned: i64,
    pub balance: i64,
    pub stats: UserStats,
    pub achievement: Option<Achievement>,
}

/// Saves the roll, counts it, pays coins equal to the size and grants the
/// zero/twenty achievements.
pub async fn commit_roll<S: Store + ?Sized>(store: &S, user_id: u64, roll: Roll, now: DateTime<Utc>) -> Result<RollCommit> {
    store.save_roll(user_id, roll.size, now).await?;
    let stats = store.record_roll_stats(user_id, roll.size).await?;

    let coins_earned = i64::from(roll.size);
    let balance = if coins_earned > 0 {
        store.add_coins(user_id, coins_earned).await?
    } else {
        store.balance(user_id).await?
    };

    let achievement = match AchievementId::for_roll(roll.size) {
        Some(id) => grant(store, user_id, id).await?,
        None => None,
    };

    Ok(RollCommit {
        size: roll.size,
        coins_earned,
        balance,
        stats,
        achievement,
    })
}

/// A duel roll: plain draw plus the event and the user's size boost. Luck and
/// reroll items do not apply.
pub async fn duel_roll<S, R>(store: &S, user_id: u64, event: Option<(String, i32)>, rng: &mut R) -> Result<Roll>
where
    S: Store + ?Sized,
    R: Rng + Send + ?Sized,
{
    let item_boost = store
        .active_effect(user_id, &EffectType::SizeBoost)
        .await?
        .map_or(0, |effect| effect.effect_value);

    let modifiers = RollModifiers {
        event,
        item_boost,
        extra_draws: 0,
    };
    let base = draw_size(rng);
    Ok(Roll {
        base,
        size: roll::clamp_size(base + modifiers.additive()),
    })
}
