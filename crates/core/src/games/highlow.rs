use rand::Rng;

use super::Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighLow {
    pub current: u32,
    pub next: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess {
    Higher,
    Lower,
}

impl Guess {
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "h" | "higher" => Some(Guess::Higher),
            "l" | "lower" => Some(Guess::Lower),
            _ => None,
        }
    }
}

impl HighLow {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            current: rng.gen_range(1..=100),
            next: rng.gen_range(1..=100),
        }
    }

    pub fn direction(&self) -> &'static str {
        if self.next > self.current {
            "higher"
        } else if self.next < self.current {
            "lower"
        } else {
            "the same"
        }
    }

    /// A tie counts as a correct guess either way.
    pub fn is_correct(&self, guess: Guess) -> bool {
        match guess {
            Guess::Higher => self.next >= self.current,
            Guess::Lower => self.next <= self.current,
        }
    }

    pub fn judge(&self, answer: &str) -> Verdict {
        match Guess::parse(answer) {
            Some(guess) if self.is_correct(guess) => Verdict::Correct,
            Some(_) => Verdict::Wrong,
            None => Verdict::Ignore,
        }
    }
}
