use eyre::Result;
use ppbot_core::models::achievement::achievement_catalog;
use ppbot_core::models::item::starter_items;
use sqlx::{Pool, Postgres};
use tracing::info;

const TABLES: [&str; 8] = [
    r#"
    CREATE TABLE IF NOT EXISTS pp_sizes (
        user_id BIGINT PRIMARY KEY,
        size INTEGER NOT NULL CHECK (size BETWEEN 0 AND 20),
        last_roll_at TIMESTAMP WITH TIME ZONE NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_stats (
        user_id BIGINT PRIMARY KEY,
        total_rolls INTEGER NOT NULL DEFAULT 0,
        zero_rolls INTEGER NOT NULL DEFAULT 0,
        max_rolls INTEGER NOT NULL DEFAULT 0,
        duel_wins INTEGER NOT NULL DEFAULT 0,
        trivia_wins INTEGER NOT NULL DEFAULT 0,
        days_as_title_holder INTEGER NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_coins (
        user_id BIGINT PRIMARY KEY,
        coins BIGINT NOT NULL DEFAULT 0 CHECK (coins >= 0)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        item_id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        description TEXT NOT NULL,
        effect_type VARCHAR(64) NOT NULL,
        effect_value INTEGER NOT NULL DEFAULT 0,
        duration_minutes INTEGER NOT NULL DEFAULT 0,
        usable BOOLEAN NOT NULL DEFAULT TRUE,
        price BIGINT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_inventory (
        user_id BIGINT NOT NULL,
        item_id INTEGER NOT NULL REFERENCES items(item_id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
        PRIMARY KEY (user_id, item_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_active_effects (
        user_id BIGINT NOT NULL,
        effect_type VARCHAR(64) NOT NULL,
        effect_value INTEGER NOT NULL,
        end_time TIMESTAMP WITH TIME ZONE NOT NULL,
        PRIMARY KEY (user_id, effect_type)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS achievements (
        achievement_id VARCHAR(64) PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        reward_role_name VARCHAR(255) NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_achievements (
        user_id BIGINT NOT NULL,
        achievement_id VARCHAR(64) NOT NULL REFERENCES achievements(achievement_id),
        earned_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        PRIMARY KEY (user_id, achievement_id)
    );
    "#,
];

const INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_pp_sizes_size ON pp_sizes(size DESC);",
    "CREATE INDEX IF NOT EXISTS idx_user_active_effects_end_time ON user_active_effects(end_time);",
    "CREATE INDEX IF NOT EXISTS idx_user_achievements_user_id ON user_achievements(user_id);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in TABLES.iter().chain(INDEXES.iter()) {
        sqlx::query(statement).execute(pool).await?;
    }

    seed_items(pool).await?;
    seed_achievements(pool).await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

/// Fills the item catalog, but only when it is empty so operators can edit it.
async fn seed_items(pool: &Pool<Postgres>) -> Result<()> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let items = starter_items();
    for item in &items {
        sqlx::query(
            r#"
            INSERT INTO items (name, description, effect_type, effect_value, duration_minutes, usable, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(item.name)
        .bind(item.description)
        .bind(item.effect_type.as_str())
        .bind(item.effect_value)
        .bind(item.duration_minutes)
        .bind(item.usable)
        .bind(item.price)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} catalog items", items.len());
    Ok(())
}

async fn seed_achievements(pool: &Pool<Postgres>) -> Result<()> {
    for achievement in achievement_catalog() {
        sqlx::query(
            r#"
            INSERT INTO achievements (achievement_id, name, description, reward_role_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (achievement_id) DO NOTHING
            "#,
        )
        .bind(&achievement.id)
        .bind(&achievement.name)
        .bind(&achievement.description)
        .bind(&achievement.reward_role_name)
        .execute(pool)
        .await?;
    }
    Ok(())
}
