use eyre::Result;
use ppbot_core::roll::size_bar;
use ppbot_db::CoinRepository;
use serenity::model::channel::Message;
use serenity::utils::Color;

use super::{HandlerContext, display_name};
use crate::services::profile::load_profile;

/// Mentioned user, else the author.
fn subject(msg: &Message) -> u64 {
    msg.mentions.first().map_or(msg.author.id.0, |user| user.id.0)
}

/// `pls profile [@user]`
pub async fn handle_profile(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let user_id = subject(msg);
    let profile = load_profile(handler_ctx.store(), user_id).await?;
    let name = display_name(&handler_ctx.ctx, msg.guild_id, user_id).await;

    let size = match &profile.size {
        Some(record) => format!("{} inches `{}`", record.size, size_bar(record.size)),
        None => "Hasn't rolled this period".to_string(),
    };
    let last_roll = profile
        .size
        .as_ref()
        .and_then(|record| record.last_roll_at)
        .map_or("Never".to_string(), |at| format!("<t:{}:R>", at.timestamp()));
    let achievements = if profile.achievements.is_empty() {
        "None yet".to_string()
    } else {
        profile
            .achievements
            .iter()
            .map(|achievement| format!("🏅 **{}**: {}", achievement.name, achievement.description))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let stats = &profile.stats;

    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("📋 {name}'s profile"))
                    .color(Color::PURPLE)
                    .field("Size", size, true)
                    .field("Last roll", last_roll, true)
                    .field("Coins", profile.coins, true)
                    .field("Rolls", stats.total_rolls, true)
                    .field("Zero rolls", stats.zero_rolls, true)
                    .field("Max rolls", stats.max_rolls, true)
                    .field("Duel wins", stats.duel_wins, true)
                    .field("Trivia wins", stats.trivia_wins, true)
                    .field("Days as title holder", stats.days_as_title_holder, true)
                    .field("Achievements", achievements, false)
            })
        })
        .await?;

    Ok(())
}

/// `pls coins [@user]`
pub async fn handle_coins(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let user_id = subject(msg);
    let balance = handler_ctx.store().balance(user_id).await?;

    let text = if user_id == msg.author.id.0 {
        format!("💰 You have **{balance}** coins.")
    } else {
        format!("💰 <@{user_id}> has **{balance}** coins.")
    };
    msg.reply(&handler_ctx.ctx, text).await?;
    Ok(())
}
