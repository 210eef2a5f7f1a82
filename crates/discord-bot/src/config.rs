use chrono_tz::Tz;
use eyre::{Result, eyre};
use ppbot_core::schedule::ResetCadence;
use std::env;

pub const DEFAULT_PREFIX: &str = "pls ";
pub const DEFAULT_TITLE_ROLE: &str = "Current HOG DADDY";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_TRIVIA_API_URL: &str = "https://the-trivia-api.com";

/// Configuration for the Discord bot.
///
/// Everything except the token and database URL has a default.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Database connection URL (required)
    pub database_url: String,
    /// Prefix for commands (defaults to "pls ")
    pub command_prefix: Option<String>,
    /// Channel for event, reset and achievement announcements
    pub announcement_channel_id: Option<u64>,
    /// Name of the role held by the leaderboard leader
    pub title_role_name: Option<String>,
    /// Timezone used for quiet hours and the reset
    pub timezone: Tz,
    pub reset_cadence: ResetCadence,
    /// Base URL of The Trivia API
    pub trivia_api_url: Option<String>,
    /// tracing filter directive, e.g. "info" or "ppbot_discord_bot=debug"
    pub log_level: Option<String>,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let token = env::var("DISCORD_TOKEN")
            .map_err(|_| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| eyre!("DATABASE_URL environment variable not set"))?;

        let announcement_channel_id = match env::var("ANNOUNCEMENT_CHANNEL_ID") {
            Ok(id) => Some(
                id.trim()
                    .parse::<u64>()
                    .map_err(|_| eyre!("ANNOUNCEMENT_CHANNEL_ID must be a valid u64"))?,
            ),
            Err(_) => None,
        };

        let timezone = match env::var("BOT_TIMEZONE") {
            Ok(name) => parse_timezone(&name)?,
            Err(_) => DEFAULT_TIMEZONE,
        };

        let reset_cadence = match env::var("RESET_CADENCE") {
            Ok(cadence) => cadence.parse::<ResetCadence>().map_err(|e| eyre!(e))?,
            Err(_) => ResetCadence::default(),
        };

        Ok(Self {
            token,
            database_url,
            command_prefix: env::var("DISCORD_COMMAND_PREFIX").ok(),
            announcement_channel_id,
            title_role_name: env::var("TITLE_ROLE_NAME").ok(),
            timezone,
            reset_cadence,
            trivia_api_url: env::var("TRIVIA_API_URL").ok(),
            log_level: env::var("LOG_LEVEL").ok(),
        })
    }

    /// Get the command prefix (defaults to "pls " if not set)
    pub fn command_prefix(&self) -> &str {
        match self.command_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => DEFAULT_PREFIX,
        }
    }

    pub fn title_role_name(&self) -> &str {
        self.title_role_name.as_deref().unwrap_or(DEFAULT_TITLE_ROLE)
    }

    pub fn trivia_api_url(&self) -> &str {
        self.trivia_api_url.as_deref().unwrap_or(DEFAULT_TRIVIA_API_URL)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Checks the token's shape so a bad token fails before connecting.
    pub fn validate_token(&self) -> Result<()> {
        serenity::utils::validate_token(&self.token)
            .map_err(|e| eyre!("DISCORD_TOKEN is not a valid bot token: {:?}", e))
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| eyre!("BOT_TIMEZONE '{}' is not a known IANA timezone", name.trim()))
}
