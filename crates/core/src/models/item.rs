use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an item (or an active effect) does. Stored as text in the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Additive bonus to rolls while active.
    SizeBoost,
    /// Shrinks another user's current size.
    ShrinkRay,
    /// Extra draws on the next roll, best one kept.
    LuckBoost,
    /// Item form of the reroll token.
    Reroll,
    /// Active-effect form of the reroll token.
    RerollAvailable,
    Other(String),
}

impl EffectType {
    pub fn as_str(&self) -> &str {
        match self {
            EffectType::SizeBoost => "pp_boost",
            EffectType::ShrinkRay => "shrink_ray",
            EffectType::LuckBoost => "luck_boost",
            EffectType::Reroll => "reroll",
            EffectType::RerollAvailable => "reroll_available",
            EffectType::Other(other) => other,
        }
    }
}

impl FromStr for EffectType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pp_boost" => EffectType::SizeBoost,
            "shrink_ray" => EffectType::ShrinkRay,
            "luck_boost" => EffectType::LuckBoost,
            "reroll" => EffectType::Reroll,
            "reroll_available" => EffectType::RerollAvailable,
            other => EffectType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i32,
    pub name: String,
    pub description: String,
    pub effect_type: EffectType,
    pub effect_value: i32,
    pub duration_minutes: i32,
    pub usable: bool,
    /// Shop price in coins. `None` means the item cannot be bought.
    pub price: Option<i64>,
}

/// Catalog row used to seed an empty `items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: &'static str,
    pub description: &'static str,
    pub effect_type: EffectType,
    pub effect_value: i32,
    pub duration_minutes: i32,
    pub usable: bool,
    pub price: Option<i64>,
}

pub fn starter_items() -> Vec<NewItem> {
    vec![
        NewItem {
            name: "Growth Potion",
            description: "Adds +2 to your rolls for the next hour.",
            effect_type: EffectType::SizeBoost,
            effect_value: 2,
            duration_minutes: 60,
            usable: true,
            price: Some(25),
        },
        NewItem {
            name: "Shrink Ray",
            description: "Shrink someone else's size by 2. Use: pls use shrink ray @user",
            effect_type: EffectType::ShrinkRay,
            effect_value: -2,
            duration_minutes: 0,
            usable: true,
            price: Some(40),
        },
        NewItem {
            name: "Lucky Socks",
            description: "Your next roll within the hour is the best of two draws.",
            effect_type: EffectType::LuckBoost,
            effect_value: 1,
            duration_minutes: 60,
            usable: true,
            price: Some(30),
        },
        NewItem {
            name: "Reroll Token",
            description: "Lets you reroll your next pp command.",
            effect_type: EffectType::Reroll,
            effect_value: 1,
            duration_minutes: 0,
            usable: true,
            price: Some(60),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item_id: i32,
    pub name: String,
    pub description: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub user_id: u64,
    pub effect_type: EffectType,
    pub effect_value: i32,
    pub end_time: DateTime<Utc>,
}

/// Minutes a reroll token stays armed after being used.
pub const REROLL_WINDOW_MINUTES: i64 = 1;

/// Strips user mentions out of `use` arguments, leaving the item name.
///
/// `"shrink ray <@123>"` becomes `"shrink ray"`.
pub fn item_query(args: &str) -> String {
    args.split_whitespace()
        .filter(|word| parse_user_mention(word).is_none())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses `<@123>` / `<@!123>` mention tokens.
pub fn parse_user_mention(token: &str) -> Option<u64> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    inner.parse().ok()
}
