use chrono::{DateTime, Duration, Utc};
use ppbot_core::errors::{BotError, BotResult};
use ppbot_core::games::blackjack::{Outcome, validate_bet};
use ppbot_core::models::item::{EffectType, Item, REROLL_WINDOW_MINUTES};
use ppbot_db::{CoinRepository, EffectRepository, ItemRepository, SizeRepository, Store};
use tracing::info;

/// What using an item did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOutcome {
    Boosted { item: Item, until: DateTime<Utc> },
    LuckArmed { item: Item, draws: u32, until: DateTime<Utc> },
    RerollArmed { item: Item, until: DateTime<Utc> },
    Shrunk { item: Item, target: u64, old: i32, new: i32 },
    Used { item: Item },
}

async fn lookup<S: Store + ?Sized>(store: &S, query: &str) -> BotResult<Item> {
    if query.trim().is_empty() {
        return Err(BotError::Validation("Which item? Give me its name.".to_string()));
    }
    store
        .find_item(query)
        .await?
        .ok_or_else(|| BotError::Validation(format!("There's no item called **{}**.", query.trim())))
}

/// Uses one of the user's items. Checks that can fail happen before the item
/// is taken; a shrink ray aimed at someone without a size is handed back.
pub async fn use_item<S: Store + ?Sized>(
    store: &S,
    user_id: u64,
    query: &str,
    target: Option<u64>,
    now: DateTime<Utc>,
) -> BotResult<UseOutcome> {
    let item = lookup(store, query).await?;
    if !item.usable {
        return Err(BotError::Validation(format!("**{}** can't be used.", item.name)));
    }

    let shrink_target = if item.effect_type == EffectType::ShrinkRay {
        match target {
            None => {
                return Err(BotError::Validation(format!(
                    "Mention who you want to hit with the **{}**.",
                    item.name
                )));
            }
            Some(target) if target == user_id => {
                return Err(BotError::Validation("You can't use that on yourself!".to_string()));
            }
            Some(target) => Some(target),
        }
    } else {
        None
    };

    if !store.remove_item(user_id, item.item_id).await? {
        return Err(BotError::Validation(format!("You don't have any **{}**.", item.name)));
    }
    info!("User {} used {}", user_id, item.name);

    let until = now + Duration::minutes(i64::from(item.duration_minutes));
    let outcome = match (&item.effect_type, shrink_target) {
        (EffectType::SizeBoost, _) => {
            store
                .apply_effect(user_id, &EffectType::SizeBoost, item.effect_value, until)
                .await?;
            UseOutcome::Boosted { item, until }
        }
        (EffectType::LuckBoost, _) => {
            store
                .apply_effect(user_id, &EffectType::LuckBoost, item.effect_value, until)
                .await?;
            let draws = item.effect_value.max(0) as u32 + 1;
            UseOutcome::LuckArmed { item, draws, until }
        }
        (EffectType::Reroll | EffectType::RerollAvailable, _) => {
            let until = now + Duration::minutes(REROLL_WINDOW_MINUTES);
            store
                .apply_effect(user_id, &EffectType::RerollAvailable, 1, until)
                .await?;
            UseOutcome::RerollArmed { item, until }
        }
        (EffectType::ShrinkRay, Some(target)) => {
            match store.shrink_size(target, item.effect_value.abs().max(1)).await? {
                Some((old, new)) => UseOutcome::Shrunk { item, target, old, new },
                None => {
                    store.add_item(user_id, item.item_id, 1).await?;
                    return Err(BotError::Validation(format!(
                        "<@{target}> hasn't rolled yet, so your **{}** was returned.",
                        item.name
                    )));
                }
            }
        }
        (EffectType::ShrinkRay, None) | (EffectType::Other(_), _) => UseOutcome::Used { item },
    };

    Ok(outcome)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub item: Item,
    pub price: i64,
    pub balance: i64,
}

pub async fn buy_item<S: Store + ?Sized>(store: &S, user_id: u64, query: &str) -> BotResult<Purchase> {
    let item = lookup(store, query).await?;
    let Some(price) = item.price else {
        return Err(BotError::Validation(format!("**{}** isn't for sale.", item.name)));
    };

    if !store.spend_coins(user_id, price).await? {
        let balance = store.balance(user_id).await?;
        return Err(BotError::Validation(format!(
            "**{}** costs {price} coins and you only have {balance}.",
            item.name
        )));
    }
    store.add_item(user_id, item.item_id, 1).await?;
    let balance = store.balance(user_id).await?;
    info!("User {} bought {} for {}", user_id, item.name, price);

    Ok(Purchase { item, price, balance })
}

/// Takes the bet up front. Fails without charging if the user can't cover it.
pub async fn place_bet<S: Store + ?Sized>(store: &S, user_id: u64, bet: i64) -> BotResult<i64> {
    let bet = validate_bet(bet)?;
    if !store.spend_coins(user_id, bet).await? {
        let balance = store.balance(user_id).await?;
        return Err(BotError::Validation(format!(
            "You can't bet {bet} coins, you only have {balance}."
        )));
    }
    Ok(bet)
}

/// Pays out a finished hand. Returns `(payout, new balance)`.
pub async fn settle_bet<S: Store + ?Sized>(store: &S, user_id: u64, outcome: Outcome, bet: i64) -> BotResult<(i64, i64)> {
    let payout = outcome.payout(bet);
    let balance = if payout > 0 {
        store.add_coins(user_id, payout).await?
    } else {
        store.balance(user_id).await?
    };
    Ok((payout, balance))
}

/// Gives a bet back, e.g. when a second table could not be opened.
pub async fn refund_bet<S: Store + ?Sized>(store: &S, user_id: u64, bet: i64) -> BotResult<i64> {
    Ok(store.add_coins(user_id, bet).await?)
}
