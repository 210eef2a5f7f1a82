use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};
use ppbot_core::events::ActiveEvent;
use ppbot_core::games::blackjack::{BlackjackGame, HitResult, Outcome};
use ppbot_core::games::duel::DuelBook;
use ppbot_core::games::ppoff::PpOff;
use ppbot_core::games::{GameBoard, TriviaCooldowns};
use ppbot_core::roll::RerollBook;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::RwLock;

/// Why a blackjack move could not be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    NoGame,
    /// The player's table is in another channel.
    OtherChannel(u64),
}

/// Result of a blackjack hit. Finished tables have already been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableMove {
    Continue(BlackjackGame),
    Finished(BlackjackGame, Outcome),
}

fn seated(
    tables: &mut HashMap<u64, BlackjackGame>,
    user_id: u64,
    channel_id: u64,
) -> Result<&mut BlackjackGame, TableError> {
    match tables.get_mut(&user_id) {
        None => Err(TableError::NoGame),
        Some(game) if game.channel_id != channel_id => Err(TableError::OtherChannel(game.channel_id)),
        Some(game) => Ok(game),
    }
}

/// In-memory state shared by every handler. Each book has its own lock, and
/// no guard is held across a network call.
#[derive(Debug, Default)]
pub struct BotState {
    pub event: RwLock<Option<ActiveEvent>>,
    pub duels: RwLock<DuelBook>,
    pub games: RwLock<GameBoard>,
    pub trivia_cooldowns: RwLock<TriviaCooldowns>,
    /// Blackjack tables keyed by player.
    pub blackjack: RwLock<HashMap<u64, BlackjackGame>>,
    pub ppoff: RwLock<Option<PpOff>>,
    pub rerolls: RwLock<RerollBook>,
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event name and effect to apply to a roll made at `now`.
    pub async fn event_modifier(&self, now: DateTime<Utc>) -> Option<(String, i32)> {
        self.event.read().await.and_then(|event| event.modifier(now))
    }

    /// Whether a roll-off is running in `channel_id` at `now`.
    pub async fn roll_off_running_in(&self, channel_id: u64, now: DateTime<Utc>) -> bool {
        self.ppoff
            .read()
            .await
            .as_ref()
            .is_some_and(|contest| contest.is_running_in(channel_id, now))
    }

    /// Starts a roll-off unless one is still running. Returns the channel of
    /// the running one on conflict.
    pub async fn start_roll_off(&self, contest: PpOff, now: DateTime<Utc>) -> Result<(), u64> {
        let mut current = self.ppoff.write().await;
        if let Some(running) = current.as_ref().filter(|running| now < running.ends_at) {
            return Err(running.channel_id);
        }
        *current = Some(contest);
        Ok(())
    }

    /// Takes the roll-off that started at `started_at`, if it is still the
    /// current one.
    pub async fn finish_roll_off(&self, started_at: DateTime<Utc>) -> Option<PpOff> {
        let mut current = self.ppoff.write().await;
        match current.as_ref() {
            Some(contest) if contest.started_at == started_at => current.take(),
            _ => None,
        }
    }

    /// Records a roll-off score if a roll-off is running in the channel.
    /// Returns true when it was a new personal best.
    pub async fn record_roll_off_score(&self, channel_id: u64, user_id: u64, score: i32, now: DateTime<Utc>) -> bool {
        let mut current = self.ppoff.write().await;
        match current.as_mut() {
            Some(contest) if contest.is_running_in(channel_id, now) => contest.record(user_id, score),
            _ => false,
        }
    }

    /// Seats a player at a new blackjack table. Returns the game back if the
    /// player already has one running.
    pub async fn seat_blackjack(&self, user_id: u64, game: BlackjackGame) -> Result<(), BlackjackGame> {
        match self.blackjack.write().await.entry(user_id) {
            Entry::Occupied(_) => Err(game),
            Entry::Vacant(slot) => {
                slot.insert(game);
                Ok(())
            }
        }
    }

    /// Deals the player another card, keeping the table seated unless the
    /// hand is over.
    pub async fn blackjack_hit(&self, user_id: u64, channel_id: u64) -> Result<TableMove, TableError> {
        let mut tables = self.blackjack.write().await;
        let game = seated(&mut tables, user_id, channel_id)?;
        let outcome = match game.hit() {
            HitResult::Continue => return Ok(TableMove::Continue(game.clone())),
            HitResult::Bust => Outcome::Bust,
            HitResult::TwentyOne => game.stand(),
        };
        let finished = tables.remove(&user_id).ok_or(TableError::NoGame)?;
        Ok(TableMove::Finished(finished, outcome))
    }

    /// Plays out the dealer's hand and closes the table.
    pub async fn blackjack_stand(&self, user_id: u64, channel_id: u64) -> Result<(BlackjackGame, Outcome), TableError> {
        let mut tables = self.blackjack.write().await;
        seated(&mut tables, user_id, channel_id)?;
        let mut game = tables.remove(&user_id).ok_or(TableError::NoGame)?;
        let outcome = game.stand();
        Ok((game, outcome))
    }
}

/// Fresh generator for one command. `StdRng` is `Send`, so it can live across
/// awaits inside handlers.
pub fn rng() -> StdRng {
    StdRng::from_entropy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppbot_core::games::blackjack::{Card, Rank, Suit};
    use pretty_assertions::assert_eq;

    const PLAYER: u64 = 7;
    const TABLE_CHANNEL: u64 = 10;

    fn stacked(draw_order: &[Rank]) -> Vec<Card> {
        draw_order.iter().rev().map(|rank| Card::new(*rank, Suit::Clubs)).collect()
    }

    #[tokio::test]
    async fn hit_keeps_the_table_until_the_hand_ends() {
        let state = BotState::new();
        // Player 10+2, dealer 10+7, then a 3 and a king.
        let deck = stacked(&[
            Rank::Number(10),
            Rank::Number(2),
            Rank::Number(10),
            Rank::Number(7),
            Rank::Number(3),
            Rank::King,
        ]);
        let game = BlackjackGame::with_deck(10, TABLE_CHANNEL, deck);
        assert!(state.seat_blackjack(PLAYER, game).await.is_ok());

        let TableMove::Continue(table) = state.blackjack_hit(PLAYER, TABLE_CHANNEL).await.unwrap() else {
            panic!("the hand should continue at 15");
        };
        assert_eq!(table.player_value(), 15);
        assert_eq!(state.blackjack.read().await.get(&PLAYER), Some(&table));

        assert_eq!(
            state.blackjack_hit(PLAYER, 20).await,
            Err(TableError::OtherChannel(TABLE_CHANNEL))
        );

        let TableMove::Finished(finished, outcome) = state.blackjack_hit(PLAYER, TABLE_CHANNEL).await.unwrap() else {
            panic!("the hand should bust at 25");
        };
        assert_eq!(outcome, Outcome::Bust);
        assert_eq!(finished.player_value(), 25);
        assert!(state.blackjack.read().await.is_empty());
        assert_eq!(state.blackjack_hit(PLAYER, TABLE_CHANNEL).await, Err(TableError::NoGame));
    }

    #[tokio::test]
    async fn stand_closes_the_table() {
        let state = BotState::new();
        let deck = stacked(&[Rank::Number(10), Rank::Number(9), Rank::Number(10), Rank::Number(8)]);
        let game = BlackjackGame::with_deck(10, TABLE_CHANNEL, deck);
        assert!(state.seat_blackjack(PLAYER, game).await.is_ok());

        let (_, outcome) = state.blackjack_stand(PLAYER, TABLE_CHANNEL).await.unwrap();
        assert_eq!(outcome, Outcome::Win);
        assert!(state.blackjack.read().await.is_empty());
    }
}
