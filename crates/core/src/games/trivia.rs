use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::Verdict;

pub const CATEGORIES: [&str; 5] = [
    "film_and_tv",
    "music",
    "sport_and_leisure",
    "general_knowledge",
    "science",
];

pub const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// One question as returned by The Trivia API v2.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuestion {
    pub category: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub question: ApiQuestionText,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuestionText {
    pub text: String,
}

/// Random category and difficulty for the next question.
pub fn pick_topic<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let category = CATEGORIES.choose(rng).copied().unwrap_or(CATEGORIES[0]);
    let difficulty = DIFFICULTIES.choose(rng).copied().unwrap_or(DIFFICULTIES[0]);
    (category, difficulty)
}

pub fn question_url(base_url: &str, category: &str, difficulty: &str) -> String {
    format!(
        "{}/v2/questions?limit=1&categories={category}&difficulties={difficulty}",
        base_url.trim_end_matches('/')
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaQuestion {
    pub question: String,
    pub correct_answer: String,
    pub choices: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

impl TriviaQuestion {
    /// Builds a question with its choices shuffled.
    pub fn from_api<R: Rng + ?Sized>(api: ApiQuestion, fallback_difficulty: &str, rng: &mut R) -> Self {
        let mut choices = api.incorrect_answers;
        choices.push(api.correct_answer.clone());
        choices.shuffle(rng);

        Self {
            question: api.question.text,
            correct_answer: api.correct_answer,
            choices,
            category: api.category,
            difficulty: api
                .difficulty
                .unwrap_or_else(|| fallback_difficulty.to_string()),
        }
    }

    /// `**A.** first\n**B.** second...`
    pub fn choices_text(&self) -> String {
        self.choices
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("**{}.** {choice}", letter(i)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `film_and_tv` -> `Film And Tv`
    pub fn category_display(&self) -> String {
        self.category
            .split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn difficulty_display(&self) -> String {
        capitalize(&self.difficulty)
    }

    pub fn difficulty_emoji(&self) -> &'static str {
        match self.difficulty.as_str() {
            "easy" => "🟢",
            "medium" => "🟡",
            _ => "🔴",
        }
    }

    /// Single-letter answers only; anything else is chatter.
    pub fn judge(&self, answer: &str) -> Verdict {
        match choice_index(answer) {
            Some(index) if index < self.choices.len() => {
                if self.choices[index] == self.correct_answer {
                    Verdict::Correct
                } else {
                    Verdict::Wrong
                }
            }
            _ => Verdict::Ignore,
        }
    }
}

fn letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// `a`..`d` (any case) to a choice index.
pub fn choice_index(answer: &str) -> Option<usize> {
    let answer = answer.trim().to_lowercase();
    let mut chars = answer.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !('a'..='d').contains(&first) {
        return None;
    }
    Some(first as usize - 'a' as usize)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
