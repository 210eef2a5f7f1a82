use color_eyre::eyre::Result;
use dotenv::dotenv;
use ppbot_db::{create_pool, schema::initialize_database};
use ppbot_discord_bot::config::BotConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = BotConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(config.log_level())?)
        .init();

    info!("Starting PP bot ({} reset, timezone {})", config.reset_cadence, config.timezone);

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start the Discord bot
    if let Err(e) = ppbot_discord_bot::start_bot(config, db_pool).await {
        error!("Discord bot error: {:?}", e);
        return Err(e);
    }

    info!("Discord bot shut down gracefully");
    Ok(())
}
