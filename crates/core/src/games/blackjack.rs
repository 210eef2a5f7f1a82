use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{BotError, BotResult};

pub const DEFAULT_BET: i64 = 10;
const DEALER_STANDS_ON: u32 = 17;
const BLACKJACK: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Ace,
    Number(u8),
    Jack,
    Queen,
    King,
}

impl Rank {
    pub fn all() -> impl Iterator<Item = Rank> {
        std::iter::once(Rank::Ace)
            .chain((2..=10).map(Rank::Number))
            .chain([Rank::Jack, Rank::Queen, Rank::King])
    }

    /// Aces count 11 here; [`hand_value`] softens them.
    fn value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Number(n) => u32::from(n),
            Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ace => f.write_str("A"),
            Rank::Number(n) => write!(f, "{n}"),
            Rank::Jack => f.write_str("J"),
            Rank::Queen => f.write_str("Q"),
            Rank::King => f.write_str("K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

pub fn fresh_deck() -> Vec<Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::all().map(move |rank| Card::new(rank, suit)))
        .collect()
}

/// Best total for a hand, counting aces as 1 where 11 would bust.
pub fn hand_value(hand: &[Card]) -> u32 {
    let mut value: u32 = hand.iter().map(|card| card.rank.value()).sum();
    let mut soft_aces = hand.iter().filter(|card| card.rank == Rank::Ace).count();
    while value > BLACKJACK && soft_aces > 0 {
        value -= 10;
        soft_aces -= 1;
    }
    value
}

pub fn format_hand(hand: &[Card], hide_hole_card: bool) -> String {
    match hand {
        [first, _, ..] if hide_hole_card => format!("{first} 🂠"),
        _ => hand
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Blackjack,
    Win,
    Lose,
    Bust,
    Push,
}

impl Outcome {
    /// Coins paid back to the player. The bet was already taken when the
    /// game started.
    pub fn payout(self, bet: i64) -> i64 {
        match self {
            Outcome::Blackjack => bet * 5 / 2,
            Outcome::Win => bet * 2,
            Outcome::Push => bet,
            Outcome::Lose | Outcome::Bust => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    Continue,
    Bust,
    /// Reached 21; the game stands automatically.
    TwentyOne,
}

pub fn validate_bet(bet: i64) -> BotResult<i64> {
    if bet <= 0 {
        return Err(BotError::Validation(
            "You need to bet at least 1 coin!".to_string(),
        ));
    }
    Ok(bet)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackjackGame {
    pub bet: i64,
    pub channel_id: u64,
    pub deck: Vec<Card>,
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
}

impl BlackjackGame {
    pub fn deal<R: Rng + ?Sized>(bet: i64, channel_id: u64, rng: &mut R) -> Self {
        let mut deck = fresh_deck();
        deck.shuffle(rng);
        Self::with_deck(bet, channel_id, deck)
    }

    /// Deals from `deck`, drawing from the end: player, player, dealer, dealer.
    pub fn with_deck(bet: i64, channel_id: u64, deck: Vec<Card>) -> Self {
        let mut game = Self {
            bet,
            channel_id,
            deck,
            player: Vec::new(),
            dealer: Vec::new(),
        };
        for _ in 0..2 {
            if let Some(card) = game.deck.pop() {
                game.player.push(card);
            }
        }
        for _ in 0..2 {
            if let Some(card) = game.deck.pop() {
                game.dealer.push(card);
            }
        }
        game
    }

    pub fn player_value(&self) -> u32 {
        hand_value(&self.player)
    }

    pub fn dealer_value(&self) -> u32 {
        hand_value(&self.dealer)
    }

    /// Value of the dealer's face-up card only.
    pub fn dealer_showing(&self) -> u32 {
        hand_value(&self.dealer[..self.dealer.len().min(1)])
    }

    pub fn is_natural(&self) -> bool {
        self.player.len() == 2 && self.player_value() == BLACKJACK
    }

    pub fn hit(&mut self) -> HitResult {
        if let Some(card) = self.deck.pop() {
            self.player.push(card);
        }
        match self.player_value() {
            value if value > BLACKJACK => HitResult::Bust,
            BLACKJACK => HitResult::TwentyOne,
            _ => HitResult::Continue,
        }
    }

    /// Settles a natural: blackjack unless the dealer also holds 21.
    pub fn settle_natural(&self) -> Outcome {
        if self.dealer_value() == BLACKJACK {
            Outcome::Push
        } else {
            Outcome::Blackjack
        }
    }

    /// Dealer draws to 17, then the hands are compared.
    pub fn stand(&mut self) -> Outcome {
        while self.dealer_value() < DEALER_STANDS_ON {
            match self.deck.pop() {
                Some(card) => self.dealer.push(card),
                None => break,
            }
        }

        let (player, dealer) = (self.player_value(), self.dealer_value());
        if player > BLACKJACK {
            Outcome::Bust
        } else if dealer > BLACKJACK || player > dealer {
            Outcome::Win
        } else if dealer > player {
            Outcome::Lose
        } else {
            Outcome::Push
        }
    }
}
