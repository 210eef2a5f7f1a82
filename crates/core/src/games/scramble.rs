use rand::Rng;
use rand::seq::SliceRandom;

use super::Verdict;

pub const WORDS: [&str; 21] = [
    // 5-6 letters
    "python", "gaming", "dragon", "wizard", "knight", "castle", "forest", "battle",
    // 7-8 letters
    "champion", "treasure", "valorant", "diamond", "keyboard", "mystery", "warrior",
    // 9+ letters
    "legendary", "adventure", "challenge", "university", "lightning", "dangerous",
];

const MAX_SHUFFLES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scramble {
    pub word: String,
    pub scrambled: String,
}

impl Scramble {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let word = WORDS.choose(rng).copied().unwrap_or(WORDS[0]);
        Self::from_word(word, rng)
    }

    /// Shuffles `word`, retrying a few times if the shuffle left it unchanged.
    pub fn from_word<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Self {
        let word = word.to_lowercase();
        let mut letters: Vec<char> = word.chars().collect();
        for _ in 0..MAX_SHUFFLES {
            letters.shuffle(rng);
            if letters.iter().collect::<String>() != word {
                break;
            }
        }

        Self {
            scrambled: letters.into_iter().collect(),
            word,
        }
    }

    pub fn difficulty_emoji(&self) -> &'static str {
        match self.word.chars().count() {
            0..=6 => "🟢",
            7..=8 => "🟡",
            _ => "🔴",
        }
    }

    /// Wrong words are ignored so players can keep guessing.
    pub fn judge(&self, answer: &str) -> Verdict {
        if answer.trim().to_lowercase() == self.word {
            Verdict::Correct
        } else {
            Verdict::Ignore
        }
    }
}
