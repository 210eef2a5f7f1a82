use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::item::{EffectType, Item};

/// Coins paid for winning a trivia question or a guessing game.
pub const GAME_COIN_REWARD: i64 = 10;

/// Weight used when drawing a reward item; lower is rarer.
pub fn reward_weight(effect: &EffectType) -> u32 {
    match effect {
        EffectType::SizeBoost => 40,
        EffectType::ShrinkRay => 30,
        EffectType::LuckBoost => 20,
        EffectType::Reroll => 10,
        _ => 25,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

impl Rarity {
    pub fn from_weight(weight: u32) -> Self {
        match weight {
            0..=10 => Rarity::VeryRare,
            11..=20 => Rarity::Rare,
            21..=30 => Rarity::Uncommon,
            _ => Rarity::Common,
        }
    }

    pub fn of(item: &Item) -> Self {
        Self::from_weight(reward_weight(&item.effect_type))
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Uncommon => "🔹 UNCOMMON 🔹",
            Rarity::Rare => "✨ RARE ✨",
            Rarity::VeryRare => "🌟 VERY RARE 🌟",
        }
    }
}

/// Picks a reward item, weighted by rarity. `None` when the catalog is empty.
pub fn pick_reward<'a, R: Rng + ?Sized>(items: &'a [Item], rng: &mut R) -> Option<&'a Item> {
    items
        .choose_weighted(rng, |item| reward_weight(&item.effect_type))
        .ok()
}
