use eyre::Result;
use ppbot_core::models::achievement::Achievement;
use serenity::model::id::{ChannelId, GuildId};
use serenity::utils::Color;
use tracing::info;

use crate::handlers::HandlerContext;
use crate::roles::grant_role_by_name;

/// Posts an unlocked achievement to the announcement channel, or to
/// `fallback` when none is configured, and hands out its reward role.
pub async fn announce_achievement(
    handler_ctx: &HandlerContext,
    fallback: ChannelId,
    guild_id: Option<GuildId>,
    user_id: u64,
    achievement: &Achievement,
) -> Result<()> {
    info!("User {} earned achievement {}", user_id, achievement.id);

    let mut reward_line = None;
    if let (Some(guild_id), Some(role_name)) = (guild_id, achievement.reward_role_name.as_deref()) {
        if grant_role_by_name(handler_ctx, guild_id, user_id, role_name).await? {
            reward_line = Some(format!("The **{role_name}** role"));
        }
    }

    handler_ctx
        .announce_channel(fallback)
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🏅 Achievement unlocked!")
                    .description(format!(
                        "<@{user_id}> earned **{}**\n{}",
                        achievement.name, achievement.description
                    ))
                    .color(Color::GOLD);
                if let Some(line) = reward_line {
                    e.field("Reward", line, false);
                }
                e
            })
        })
        .await?;
    Ok(())
}
