use std::time::Instant;

use eyre::Result;
use serenity::model::channel::Message;
use serenity::utils::Color;

use super::HandlerContext;
use crate::commands::help::help_embed;

/// `pls help`
pub async fn handle_help(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let embed = help_embed(handler_ctx.prefix());
    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| m.set_embed(embed))
        .await?;
    Ok(())
}

/// `pls info`
pub async fn handle_info(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guilds = handler_ctx.ctx.cache.guilds().len();
    let prefix = handler_ctx.prefix();

    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("📏 PP Bot")
                    .description(format!(
                        "Roll your size once an hour, climb the leaderboard and play minigames for coins and items.\nSee `{prefix}help` for every command."
                    ))
                    .field("Library", "serenity", true)
                    .field("Servers", guilds.to_string(), true)
                    .field("Version", env!("CARGO_PKG_VERSION"), true)
                    .color(Color::BLURPLE)
            })
        })
        .await?;
    Ok(())
}

/// `pls ping`
pub async fn handle_ping(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let started = Instant::now();
    let mut reply = msg.channel_id.say(&handler_ctx.ctx.http, "🏓 Pong!").await?;
    let elapsed = started.elapsed().as_millis();

    reply
        .edit(&handler_ctx.ctx, |m| m.content(format!("🏓 Pong! Round trip: **{elapsed}ms**")))
        .await?;
    Ok(())
}
