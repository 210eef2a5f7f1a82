//! Minigame state. Each guessing game is a small puzzle type; the
//! [`GameBoard`] keeps at most one active round of each kind per channel and
//! decides who answered what.

pub mod blackjack;
pub mod duel;
pub mod highlow;
pub mod mathrush;
pub mod ppoff;
pub mod scramble;
pub mod trivia;
pub mod wyr;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use self::highlow::HighLow;
use self::mathrush::MathProblem;
use self::scramble::Scramble;
use self::trivia::TriviaQuestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Trivia,
    Scramble,
    HighLow,
    MathRush,
}

impl GameKind {
    /// Checked in this order when a chat message arrives.
    pub const ANSWER_ORDER: [GameKind; 4] = [
        GameKind::Scramble,
        GameKind::HighLow,
        GameKind::MathRush,
        GameKind::Trivia,
    ];

    /// How long a round stays open.
    pub fn timeout(self) -> Duration {
        match self {
            GameKind::Trivia => Duration::seconds(15),
            GameKind::Scramble => Duration::seconds(20),
            GameKind::HighLow => Duration::seconds(15),
            GameKind::MathRush => Duration::seconds(10),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameKind::Trivia => "trivia question",
            GameKind::Scramble => "scramble",
            GameKind::HighLow => "Higher/Lower game",
            GameKind::MathRush => "Math Rush",
        }
    }
}

/// How a message relates to an open round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not an answer to this round; leave the user alone.
    Ignore,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Puzzle {
    Trivia(TriviaQuestion),
    Scramble(Scramble),
    HighLow(HighLow),
    MathRush(MathProblem),
}

impl Puzzle {
    pub fn kind(&self) -> GameKind {
        match self {
            Puzzle::Trivia(_) => GameKind::Trivia,
            Puzzle::Scramble(_) => GameKind::Scramble,
            Puzzle::HighLow(_) => GameKind::HighLow,
            Puzzle::MathRush(_) => GameKind::MathRush,
        }
    }

    pub fn judge(&self, answer: &str) -> Verdict {
        match self {
            Puzzle::Trivia(question) => question.judge(answer),
            Puzzle::Scramble(scramble) => scramble.judge(answer),
            Puzzle::HighLow(game) => game.judge(answer),
            Puzzle::MathRush(problem) => problem.judge(answer),
        }
    }

    /// Text revealing the solution, used on timeout and on a win.
    pub fn solution(&self) -> String {
        match self {
            Puzzle::Trivia(question) => question.correct_answer.clone(),
            Puzzle::Scramble(scramble) => scramble.word.to_uppercase(),
            Puzzle::HighLow(game) => format!("{} ({})", game.next, game.direction()),
            Puzzle::MathRush(problem) => format!("{} = {}", problem.text, problem.answer),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRound {
    pub puzzle: Puzzle,
    pub guild_id: u64,
    pub message_id: u64,
    pub started_at: DateTime<Utc>,
    /// Users who already used their single attempt.
    pub answered: HashSet<u64>,
}

impl ActiveRound {
    pub fn new(puzzle: Puzzle, guild_id: u64, message_id: u64, started_at: DateTime<Utc>) -> Self {
        Self {
            puzzle,
            guild_id,
            message_id,
            started_at,
            answered: HashSet::new(),
        }
    }
}

/// What happened when a user's message was checked against the board.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The user won; the round has been closed.
    Won(ActiveRound),
    /// The user used up their attempt on this round.
    Missed { kind: GameKind, solution_hint: Option<String> },
}

#[derive(Debug, Default)]
pub struct GameBoard {
    rounds: HashMap<(u64, GameKind), ActiveRound>,
}

impl GameBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message id of the round of `kind` currently open in `channel_id`.
    pub fn active_message(&self, channel_id: u64, kind: GameKind) -> Option<u64> {
        self.rounds.get(&(channel_id, kind)).map(|round| round.message_id)
    }

    /// Opens a round unless one of the same kind is already running in the
    /// channel, in which case the running round's message id is returned.
    pub fn open(&mut self, channel_id: u64, round: ActiveRound) -> Result<(), u64> {
        let key = (channel_id, round.puzzle.kind());
        if let Some(existing) = self.rounds.get(&key) {
            return Err(existing.message_id);
        }
        self.rounds.insert(key, round);
        Ok(())
    }

    /// Checks a chat message against every open round in the channel.
    pub fn submit(&mut self, channel_id: u64, user_id: u64, answer: &str) -> Option<Submission> {
        for kind in GameKind::ANSWER_ORDER {
            let key = (channel_id, kind);
            let Some(round) = self.rounds.get_mut(&key) else {
                continue;
            };
            if round.answered.contains(&user_id) {
                continue;
            }

            match round.puzzle.judge(answer) {
                Verdict::Ignore => continue,
                Verdict::Correct => {
                    return self.rounds.remove(&key).map(Submission::Won);
                }
                Verdict::Wrong => {
                    round.answered.insert(user_id);
                    let solution_hint = match &round.puzzle {
                        Puzzle::HighLow(game) => Some(game.next.to_string()),
                        _ => None,
                    };
                    return Some(Submission::Missed { kind, solution_hint });
                }
            }
        }
        None
    }

    /// Closes a round on timeout. Only closes the round that was started with
    /// `message_id`; a newer round of the same kind is left running.
    pub fn expire(&mut self, channel_id: u64, kind: GameKind, message_id: u64) -> Option<ActiveRound> {
        let key = (channel_id, kind);
        match self.rounds.get(&key) {
            Some(round) if round.message_id == message_id => self.rounds.remove(&key),
            _ => None,
        }
    }
}

/// Per-guild trivia cooldown measured from the last correct answer.
#[derive(Debug, Default)]
pub struct TriviaCooldowns {
    last_win: HashMap<u64, DateTime<Utc>>,
}

impl TriviaCooldowns {
    pub const COOLDOWN_SECONDS: i64 = 60;

    pub fn remaining(&self, guild_id: u64, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_win.get(&guild_id)?;
        let remaining = *last + Duration::seconds(Self::COOLDOWN_SECONDS) - now;
        (remaining > Duration::zero()).then_some(remaining)
    }

    pub fn record_win(&mut self, guild_id: u64, at: DateTime<Utc>) {
        self.last_win.insert(guild_id, at);
    }

    pub fn clear(&mut self, guild_id: u64) {
        self.last_win.remove(&guild_id);
    }
}

/// `1 minute and 5 seconds` style cooldown text.
pub fn format_cooldown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let (minutes, seconds) = (total / 60, total % 60);
    let seconds_text = format!("{seconds} second{}", if seconds == 1 { "" } else { "s" });
    if minutes > 0 {
        format!("{minutes} minute{} and {seconds_text}", if minutes > 1 { "s" } else { "" })
    } else {
        seconds_text
    }
}
