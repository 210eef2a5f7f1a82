use std::time::Duration;

use eyre::{Result, eyre};
use ppbot_core::games::trivia::{ApiQuestion, question_url};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for The Trivia API.
#[derive(Debug, Clone)]
pub struct TriviaClient {
    http: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one question for the given category and difficulty.
    pub async fn fetch_question(&self, category: &str, difficulty: &str) -> Result<ApiQuestion> {
        let url = question_url(&self.base_url, category, difficulty);
        debug!("Fetching trivia question from {}", url);

        let response = self.http.get(&url).timeout(REQUEST_TIMEOUT).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(eyre!("Trivia API returned {}: {}", status, error_text));
        }

        let questions: Vec<ApiQuestion> = response.json().await?;
        questions
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("Trivia API returned no questions"))
    }
}
