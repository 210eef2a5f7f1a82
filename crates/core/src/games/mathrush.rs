use rand::Rng;

use super::Verdict;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathProblem {
    pub text: String,
    pub answer: i64,
}

impl MathProblem {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => {
                let (a, b) = (rng.gen_range(5..=50), rng.gen_range(5..=50));
                Self::from_parts(a, '+', b)
            }
            1 => {
                let (a, b) = (rng.gen_range(5..=50), rng.gen_range(5..=50));
                Self::from_parts(a, '-', b)
            }
            _ => {
                let (a, b) = (rng.gen_range(2..=12), rng.gen_range(2..=12));
                Self::from_parts(a, '×', b)
            }
        }
    }

    pub fn from_parts(a: i64, op: char, b: i64) -> Self {
        let answer = match op {
            '+' => a + b,
            '-' => a - b,
            _ => a * b,
        };
        Self {
            text: format!("{a} {op} {b}"),
            answer,
        }
    }

    /// Non-numbers and wrong numbers are both ignored.
    pub fn judge(&self, answer: &str) -> Verdict {
        match answer.trim().parse::<i64>() {
            Ok(value) if value == self.answer => Verdict::Correct,
            _ => Verdict::Ignore,
        }
    }
}
