use std::sync::Arc;

use eyre::Result;
use ppbot_db::{DbPool, PgStore, Store};
use serenity::{Client, prelude::GatewayIntents};
use tracing::info;

pub mod announce;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod roles;
pub mod services;
pub mod state;
pub mod tasks;
pub mod trivia_client;

/// Start the Discord bot with the provided configuration and database connection.
///
/// Runs until the gateway connection ends or fails.
///
/// # Arguments
///
/// * `config` - The bot configuration (token, prefix, announcement channel, ...)
/// * `db_pool` - A PostgreSQL connection pool for the bot's tables
pub async fn start_bot(config: config::BotConfig, db_pool: DbPool) -> Result<()> {
    info!("Starting Discord bot");
    config.validate_token()?;

    let store: Arc<dyn Store> = Arc::new(PgStore::new(db_pool));
    let token = config.token.clone();
    let handler = handlers::Handler::new(config, store);

    // Message content for prefix commands, guild members for the title role.
    let intents =
        GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&token, intents).event_handler(handler).await?;

    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}
