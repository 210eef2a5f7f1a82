use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use ppbot_core::errors::BotError;
use ppbot_core::games::blackjack::Outcome;
use ppbot_core::models::achievement::{Achievement, AchievementId};
use ppbot_core::models::item::{ActiveEffect, EffectType, Item};
use ppbot_core::models::size::{Counter, LeaderboardEntry, SizeRecord, UserStats};
use ppbot_core::rewards::{GAME_COIN_REWARD, Rarity};
use ppbot_core::roll::{MAX_SIZE, MIN_SIZE, Roll, clamp_size};
use ppbot_db::mock::MockStore;
use ppbot_discord_bot::services::economy::{self, UseOutcome};
use ppbot_discord_bot::services::profile::load_profile;
use ppbot_discord_bot::services::reset::run_reset;
use ppbot_discord_bot::services::rewards::{pay_game_reward, record_trivia_win};
use ppbot_discord_bot::services::rolls::{RollStart, commit_roll, start_roll};
use rand::SeedableRng;
use rand::rngs::StdRng;

const USER: u64 = 1001;
const TARGET: u64 = 2002;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
}

fn item(item_id: i32, name: &str, effect_type: EffectType, effect_value: i32, duration_minutes: i32) -> Item {
    Item {
        item_id,
        name: name.to_string(),
        description: format!("{name} description"),
        effect_type,
        effect_value,
        duration_minutes,
        usable: true,
        price: Some(25),
    }
}

fn growth_potion() -> Item {
    item(1, "Growth Potion", EffectType::SizeBoost, 2, 60)
}

fn shrink_ray() -> Item {
    item(2, "Shrink Ray", EffectType::ShrinkRay, -2, 0)
}

fn reroll_token() -> Item {
    item(4, "Reroll Token", EffectType::Reroll, 1, 0)
}

fn expect_find(store: &mut MockStore, found: Item) {
    store
        .expect_find_item()
        .returning(move |_| Ok(Some(found.clone())));
}

fn validation_text(err: BotError) -> String {
    match err {
        BotError::Validation(text) => text,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// Rolling

#[test_log::test(tokio::test)]
async fn test_start_roll_respects_hourly_cooldown() {
    let mut store = MockStore::new();
    store.expect_get_size().with(eq(USER)).returning(|user_id| {
        Ok(Some(SizeRecord {
            user_id,
            size: 9,
            last_roll_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 5, 0).unwrap()),
        }))
    });

    let mut rng = StdRng::seed_from_u64(3);
    let start = start_roll(&store, USER, now(), None, false, &mut rng).await.unwrap();

    assert_eq!(
        start,
        RollStart::CoolingDown {
            next_roll_at: Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
            remaining: Duration::minutes(30),
        }
    );
}

fn expect_no_effects(store: &mut MockStore) {
    store.expect_active_effect().returning(|_, _| Ok(None));
    store.expect_consume_effect().returning(|_, _| Ok(false));
}

#[test_log::test(tokio::test)]
async fn test_start_roll_skips_cooldown_during_roll_off() {
    let mut store = MockStore::new();
    store.expect_get_size().never();
    expect_no_effects(&mut store);

    let mut rng = StdRng::seed_from_u64(3);
    let start = start_roll(&store, USER, now(), None, true, &mut rng).await.unwrap();

    assert!(matches!(start, RollStart::Rolled { reroll_offered: false, .. }));
}

#[test_log::test(tokio::test)]
async fn test_start_roll_applies_items_and_event() {
    let mut store = MockStore::new();
    store.expect_get_size().returning(|_| Ok(None));
    store
        .expect_active_effect()
        .with(eq(USER), eq(EffectType::SizeBoost))
        .returning(|user_id, _| {
            Ok(Some(ActiveEffect {
                user_id,
                effect_type: EffectType::SizeBoost,
                effect_value: 2,
                end_time: now() + Duration::minutes(30),
            }))
        });
    store
        .expect_active_effect()
        .with(eq(USER), eq(EffectType::LuckBoost))
        .returning(|user_id, _| {
            Ok(Some(ActiveEffect {
                user_id,
                effect_type: EffectType::LuckBoost,
                effect_value: 1,
                end_time: now() + Duration::minutes(30),
            }))
        });
    store
        .expect_consume_effect()
        .with(eq(USER), eq(EffectType::LuckBoost))
        .times(1)
        .returning(|_, _| Ok(true));
    store
        .expect_consume_effect()
        .with(eq(USER), eq(EffectType::RerollAvailable))
        .times(1)
        .returning(|_, _| Ok(true));
    store
        .expect_save_roll()
        .with(eq(USER), always(), eq(now()))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut rng = StdRng::seed_from_u64(11);
    let event = Some(("Cold Snap".to_string(), -2));
    let start = start_roll(&store, USER, now(), event, false, &mut rng).await.unwrap();

    let RollStart::Rolled {
        roll,
        modifiers,
        reroll_offered,
    } = start
    else {
        panic!("expected a roll, got {start:?}");
    };
    assert!(reroll_offered);
    assert_eq!(modifiers.item_boost, 2);
    assert_eq!(modifiers.extra_draws, 1);
    assert_eq!(modifiers.additive(), 0);
    assert_eq!(roll.size, clamp_size(roll.base));
}

#[test_log::test(tokio::test)]
async fn test_reroll_prompt_holds_the_hour() {
    let saved: Arc<Mutex<Option<SizeRecord>>> = Arc::new(Mutex::new(Some(SizeRecord {
        user_id: USER,
        size: 6,
        last_roll_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 10, 0).unwrap()),
    })));

    let mut store = MockStore::new();
    let reads = Arc::clone(&saved);
    store
        .expect_get_size()
        .with(eq(USER))
        .returning(move |_| Ok(reads.lock().unwrap().clone()));
    store.expect_active_effect().returning(|_, _| Ok(None));
    store
        .expect_consume_effect()
        .with(eq(USER), eq(EffectType::RerollAvailable))
        .times(1)
        .returning(|_, _| Ok(true));
    let writes = Arc::clone(&saved);
    store
        .expect_save_roll()
        .with(eq(USER), always(), eq(now()))
        .times(1)
        .returning(move |user_id, size, rolled_at| {
            *writes.lock().unwrap() = Some(SizeRecord {
                user_id,
                size,
                last_roll_at: Some(rolled_at),
            });
            Ok(())
        });

    let mut rng = StdRng::seed_from_u64(5);
    let first = start_roll(&store, USER, now(), None, false, &mut rng).await.unwrap();
    assert!(matches!(first, RollStart::Rolled { reroll_offered: true, .. }));

    // Rolling again from another channel while the prompt is open.
    let later = now() + Duration::seconds(10);
    let second = start_roll(&store, USER, later, None, false, &mut rng).await.unwrap();
    assert_eq!(
        second,
        RollStart::CoolingDown {
            next_roll_at: Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
            remaining: Duration::minutes(29) + Duration::seconds(50),
        }
    );
}

#[test_log::test(tokio::test)]
async fn test_commit_max_roll_pays_coins_and_grants_achievement() {
    let mut store = MockStore::new();
    store
        .expect_save_roll()
        .with(eq(USER), eq(MAX_SIZE), eq(now()))
        .times(1)
        .returning(|_, _, _| Ok(()));
    store.expect_record_roll_stats().returning(|user_id, _| {
        Ok(UserStats {
            user_id,
            total_rolls: 4,
            max_rolls: 1,
            ..UserStats::default()
        })
    });
    store
        .expect_add_coins()
        .with(eq(USER), eq(i64::from(MAX_SIZE)))
        .returning(|_, _| Ok(120));
    store
        .expect_grant_achievement()
        .with(eq(USER), eq("roll_a_twenty"))
        .returning(|_, _| Ok(Some(Achievement::from(AchievementId::RollATwenty))));

    let roll = Roll { base: 18, size: MAX_SIZE };
    let commit = commit_roll(&store, USER, roll, now()).await.unwrap();

    assert_eq!(commit.size, MAX_SIZE);
    assert_eq!(commit.coins_earned, 20);
    assert_eq!(commit.balance, 120);
    assert_eq!(commit.stats.total_rolls, 4);
    assert_eq!(commit.achievement.map(|a| a.name), Some("Maxed Out".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_commit_zero_roll_earns_nothing() {
    let mut store = MockStore::new();
    store.expect_save_roll().returning(|_, _, _| Ok(()));
    store
        .expect_record_roll_stats()
        .returning(|user_id, _| Ok(UserStats { user_id, ..UserStats::default() }));
    store.expect_add_coins().never();
    store.expect_balance().returning(|_| Ok(7));
    // Already earned earlier.
    store
        .expect_grant_achievement()
        .with(eq(USER), eq("roll_a_zero"))
        .returning(|_, _| Ok(None));

    let roll = Roll { base: 1, size: MIN_SIZE };
    let commit = commit_roll(&store, USER, roll, now()).await.unwrap();

    assert_eq!(commit.coins_earned, 0);
    assert_eq!(commit.balance, 7);
    assert_eq!(commit.achievement, None);
}

// Items

#[test_log::test(tokio::test)]
async fn test_use_growth_potion_applies_timed_boost() {
    let mut store = MockStore::new();
    expect_find(&mut store, growth_potion());
    store.expect_remove_item().with(eq(USER), eq(1)).returning(|_, _| Ok(true));
    let until = now() + Duration::minutes(60);
    store
        .expect_apply_effect()
        .with(eq(USER), eq(EffectType::SizeBoost), eq(2), eq(until))
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let outcome = economy::use_item(&store, USER, "growth potion", None, now()).await.unwrap();

    assert_eq!(outcome, UseOutcome::Boosted { item: growth_potion(), until });
}

#[test_log::test(tokio::test)]
async fn test_use_reroll_token_arms_reroll_for_a_minute() {
    let mut store = MockStore::new();
    expect_find(&mut store, reroll_token());
    store.expect_remove_item().returning(|_, _| Ok(true));
    let until = now() + Duration::minutes(1);
    store
        .expect_apply_effect()
        .with(eq(USER), eq(EffectType::RerollAvailable), eq(1), eq(until))
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let outcome = economy::use_item(&store, USER, "reroll token", None, now()).await.unwrap();

    assert_eq!(outcome, UseOutcome::RerollArmed { item: reroll_token(), until });
}

#[test_log::test(tokio::test)]
async fn test_shrink_ray_needs_a_target_and_keeps_the_item() {
    let mut store = MockStore::new();
    expect_find(&mut store, shrink_ray());
    store.expect_remove_item().never();

    let err = economy::use_item(&store, USER, "shrink ray", None, now()).await.unwrap_err();
    assert!(validation_text(err).contains("Mention who"));

    let err = economy::use_item(&store, USER, "shrink ray", Some(USER), now())
        .await
        .unwrap_err();
    assert_eq!(validation_text(err), "You can't use that on yourself!");
}

#[test_log::test(tokio::test)]
async fn test_shrink_ray_shrinks_target() {
    let mut store = MockStore::new();
    expect_find(&mut store, shrink_ray());
    store.expect_remove_item().returning(|_, _| Ok(true));
    store
        .expect_shrink_size()
        .with(eq(TARGET), eq(2))
        .returning(|_, _| Ok(Some((5, 3))));

    let outcome = economy::use_item(&store, USER, "shrink ray", Some(TARGET), now())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        UseOutcome::Shrunk {
            item: shrink_ray(),
            target: TARGET,
            old: 5,
            new: 3,
        }
    );
}

#[test_log::test(tokio::test)]
async fn test_zero_strength_shrink_ray_still_shrinks_by_one() {
    let mut store = MockStore::new();
    let weak_ray = item(2, "Shrink Ray", EffectType::ShrinkRay, 0, 0);
    expect_find(&mut store, weak_ray.clone());
    store.expect_remove_item().returning(|_, _| Ok(true));
    store
        .expect_shrink_size()
        .with(eq(TARGET), eq(1))
        .times(1)
        .returning(|_, _| Ok(Some((5, 4))));

    let outcome = economy::use_item(&store, USER, "shrink ray", Some(TARGET), now())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        UseOutcome::Shrunk {
            item: weak_ray,
            target: TARGET,
            old: 5,
            new: 4,
        }
    );
}

#[test_log::test(tokio::test)]
async fn test_shrink_ray_on_unrolled_target_is_returned() {
    let mut store = MockStore::new();
    expect_find(&mut store, shrink_ray());
    store.expect_remove_item().times(1).returning(|_, _| Ok(true));
    store.expect_shrink_size().returning(|_, _| Ok(None));
    store
        .expect_add_item()
        .with(eq(USER), eq(2), eq(1))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let err = economy::use_item(&store, USER, "shrink ray", Some(TARGET), now())
        .await
        .unwrap_err();

    assert!(validation_text(err).contains("returned"));
}

#[test_log::test(tokio::test)]
async fn test_use_item_not_owned() {
    let mut store = MockStore::new();
    expect_find(&mut store, growth_potion());
    store.expect_remove_item().returning(|_, _| Ok(false));
    store.expect_apply_effect().never();

    let err = economy::use_item(&store, USER, "growth potion", None, now()).await.unwrap_err();

    assert_eq!(validation_text(err), "You don't have any **Growth Potion**.");
}

#[test_log::test(tokio::test)]
async fn test_use_unknown_item() {
    let mut store = MockStore::new();
    store.expect_find_item().returning(|_| Ok(None));

    let err = economy::use_item(&store, USER, "banana", None, now()).await.unwrap_err();

    assert_eq!(validation_text(err), "There's no item called **banana**.");
}

// Shop and bets

#[test_log::test(tokio::test)]
async fn test_buy_item() {
    let mut store = MockStore::new();
    expect_find(&mut store, growth_potion());
    store
        .expect_spend_coins()
        .with(eq(USER), eq(25))
        .returning(|_, _| Ok(true));
    store
        .expect_add_item()
        .with(eq(USER), eq(1), eq(1))
        .times(1)
        .returning(|_, _, _| Ok(()));
    store.expect_balance().returning(|_| Ok(15));

    let purchase = economy::buy_item(&store, USER, "growth potion").await.unwrap();

    assert_eq!(purchase.price, 25);
    assert_eq!(purchase.balance, 15);
    assert_eq!(purchase.item, growth_potion());
}

#[test_log::test(tokio::test)]
async fn test_buy_item_without_enough_coins() {
    let mut store = MockStore::new();
    expect_find(&mut store, growth_potion());
    store.expect_spend_coins().returning(|_, _| Ok(false));
    store.expect_balance().returning(|_| Ok(10));
    store.expect_add_item().never();

    let err = economy::buy_item(&store, USER, "growth potion").await.unwrap_err();

    assert_eq!(
        validation_text(err),
        "**Growth Potion** costs 25 coins and you only have 10."
    );
}

#[test_log::test(tokio::test)]
async fn test_buy_item_not_for_sale() {
    let mut store = MockStore::new();
    let mut prize = growth_potion();
    prize.price = None;
    expect_find(&mut store, prize);
    store.expect_spend_coins().never();

    let err = economy::buy_item(&store, USER, "growth potion").await.unwrap_err();

    assert!(validation_text(err).contains("isn't for sale"));
}

#[test_log::test(tokio::test)]
async fn test_place_bet() {
    let mut store = MockStore::new();
    store
        .expect_spend_coins()
        .with(eq(USER), eq(30))
        .returning(|_, _| Ok(true));

    assert_eq!(economy::place_bet(&store, USER, 30).await.unwrap(), 30);
}

#[test_log::test(tokio::test)]
async fn test_place_bet_rejects_bad_bets() {
    let mut store = MockStore::new();
    store
        .expect_spend_coins()
        .with(always(), eq(500))
        .returning(|_, _| Ok(false));
    store.expect_balance().returning(|_| Ok(40));

    let err = economy::place_bet(&store, USER, 0).await.unwrap_err();
    assert_eq!(validation_text(err), "You need to bet at least 1 coin!");

    let err = economy::place_bet(&store, USER, 500).await.unwrap_err();
    assert_eq!(validation_text(err), "You can't bet 500 coins, you only have 40.");
}

#[test_log::test(tokio::test)]
async fn test_settle_bet() {
    let mut store = MockStore::new();
    store
        .expect_add_coins()
        .with(eq(USER), eq(25))
        .returning(|_, _| Ok(125));
    store.expect_balance().returning(|_| Ok(90));

    assert_eq!(
        economy::settle_bet(&store, USER, Outcome::Blackjack, 10).await.unwrap(),
        (25, 125)
    );
    assert_eq!(
        economy::settle_bet(&store, USER, Outcome::Lose, 10).await.unwrap(),
        (0, 90)
    );
}

// Rewards and reset

#[test_log::test(tokio::test)]
async fn test_game_reward_pays_coins_and_an_item() {
    let mut store = MockStore::new();
    store
        .expect_add_coins()
        .with(eq(USER), eq(GAME_COIN_REWARD))
        .returning(|_, _| Ok(50));
    store
        .expect_list_items()
        .returning(|| Ok(vec![reroll_token()]));
    store
        .expect_add_item()
        .with(eq(USER), eq(4), eq(1))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut rng = StdRng::seed_from_u64(5);
    let reward = pay_game_reward(&store, USER, &mut rng).await.unwrap();

    assert_eq!(reward.coins, GAME_COIN_REWARD);
    assert_eq!(reward.balance, 50);
    assert_eq!(reward.item, Some((reroll_token(), Rarity::VeryRare)));
}

#[test_log::test(tokio::test)]
async fn test_game_reward_with_empty_catalog() {
    let mut store = MockStore::new();
    store.expect_add_coins().returning(|_, _| Ok(10));
    store.expect_list_items().returning(|| Ok(Vec::new()));
    store.expect_add_item().never();

    let mut rng = StdRng::seed_from_u64(5);
    let reward = pay_game_reward(&store, USER, &mut rng).await.unwrap();

    assert_eq!(reward.item, None);
}

#[test_log::test(tokio::test)]
async fn test_first_trivia_win_grants_achievement() {
    let mut store = MockStore::new();
    store
        .expect_increment_stat()
        .with(eq(USER), eq(Counter::TriviaWins))
        .returning(|_, _| Ok(1));
    store
        .expect_grant_achievement()
        .with(eq(USER), eq("first_win_trivia"))
        .returning(|_, _| Ok(Some(Achievement::from(AchievementId::FirstTriviaWin))));

    let record = record_trivia_win(&store, USER).await.unwrap();

    assert_eq!(record.wins, 1);
    assert_eq!(record.achievement.map(|a| a.id), Some("first_win_trivia".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_reset_credits_the_leader() {
    let mut store = MockStore::new();
    store.expect_top_sizes().with(eq(1)).returning(|_| {
        Ok(vec![LeaderboardEntry {
            user_id: USER,
            size: 17,
        }])
    });
    store
        .expect_increment_stat()
        .with(eq(USER), eq(Counter::DaysAsTitleHolder))
        .returning(|_, _| Ok(3));
    store
        .expect_grant_achievement()
        .with(eq(USER), eq("became_title_holder"))
        .returning(|_, _| Ok(None));
    store.expect_clear_sizes().times(1).returning(|| Ok(6));

    let summary = run_reset(&store).await.unwrap();

    let champion = summary.champion.unwrap();
    assert_eq!(champion.user_id, USER);
    assert_eq!(champion.size, 17);
    assert_eq!(champion.days_as_title_holder, 3);
    assert_eq!(summary.cleared, 6);
}

#[test_log::test(tokio::test)]
async fn test_reset_with_empty_board() {
    let mut store = MockStore::new();
    store.expect_top_sizes().returning(|_| Ok(Vec::new()));
    store.expect_increment_stat().never();
    store.expect_clear_sizes().times(1).returning(|| Ok(0));

    let summary = run_reset(&store).await.unwrap();

    assert_eq!(summary.champion, None);
    assert_eq!(summary.cleared, 0);
}

#[test_log::test(tokio::test)]
async fn test_profile_defaults_for_new_user() {
    let mut store = MockStore::new();
    store.expect_get_size().returning(|_| Ok(None));
    store.expect_get_stats().returning(|_| Ok(None));
    store.expect_balance().returning(|_| Ok(0));
    store.expect_earned_achievements().returning(|_| Ok(Vec::new()));

    let profile = load_profile(&store, USER).await.unwrap();

    assert_eq!(profile.stats.user_id, USER);
    assert_eq!(profile.stats.total_rolls, 0);
    assert_eq!(profile.coins, 0);
    assert!(profile.size.is_none());
}
