use chrono::Utc;
use eyre::Result;
use ppbot_core::games::ppoff::{DEFAULT_MINUTES, PpOff, STANDINGS_SHOWN};
use ppbot_core::schedule::to_std;
use serenity::model::{
    channel::Message,
    id::{ChannelId, GuildId},
};
use serenity::utils::Color;
use tracing::{error, info};

use super::{HandlerContext, display_name, require_guild, user_error};

fn parse_minutes(args: &str) -> Result<i64> {
    match args.split_whitespace().next() {
        None => Ok(DEFAULT_MINUTES),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| user_error(format!("**{raw}** isn't a number of minutes."))),
    }
}

/// `pls ppoff [minutes]`
pub async fn handle_ppoff(handler_ctx: &HandlerContext, msg: &Message, args: &str) -> Result<()> {
    let guild_id = require_guild(msg)?;
    let minutes = parse_minutes(args)?;
    let now = Utc::now();

    let contest = PpOff::start(msg.channel_id.0, minutes, now)?;
    let (started_at, ends_at) = (contest.started_at, contest.ends_at);
    if let Err(channel_id) = handler_ctx.state.start_roll_off(contest, now).await {
        return Err(user_error(format!("A roll-off is already running in <#{channel_id}>.")));
    }
    info!("Roll-off started in {} for {} minutes", msg.channel_id, minutes);

    let prefix = handler_ctx.prefix();
    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🏁 Roll-off started!")
                    .description(format!(
                        "Roll with `{prefix}pp` in this channel. No cooldown until <t:{}:t>.\nBest roll wins!",
                        ends_at.timestamp()
                    ))
                    .field("Duration", format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" }), true)
                    .color(Color::ORANGE)
            })
        })
        .await?;

    let handler_ctx = handler_ctx.clone();
    let channel_id = msg.channel_id;
    tokio::spawn(async move {
        tokio::time::sleep(to_std(ends_at - Utc::now())).await;

        let Some(contest) = handler_ctx.state.finish_roll_off(started_at).await else {
            return;
        };
        if let Err(e) = announce_results(&handler_ctx, channel_id, guild_id, &contest).await {
            error!("Failed to announce roll-off results: {:?}", e);
        }
    });

    Ok(())
}

async fn announce_results(
    handler_ctx: &HandlerContext,
    channel_id: ChannelId,
    guild_id: GuildId,
    contest: &PpOff,
) -> Result<()> {
    let Some((winner, best)) = contest.winner() else {
        channel_id
            .say(&handler_ctx.ctx.http, "🏁 The roll-off is over, but nobody participated.")
            .await?;
        return Ok(());
    };

    let mut lines = Vec::new();
    for (rank, (user_id, score)) in contest.standings().into_iter().take(STANDINGS_SHOWN).enumerate() {
        let name = display_name(&handler_ctx.ctx, Some(guild_id), user_id).await;
        lines.push(format!("**{}.** {name}: {score} inches", rank + 1));
    }
    let winner_name = display_name(&handler_ctx.ctx, Some(guild_id), winner).await;
    info!("Roll-off in {} won by {} with {}", channel_id, winner, best);

    channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🏁 Roll-off results")
                    .description(format!("🏆 **{winner_name}** wins with **{best} inches**!"))
                    .field("Standings", lines.join("\n"), false)
                    .color(Color::GOLD)
                    .footer(|f| f.text(format!("{} participants", contest.participants())))
            })
        })
        .await?;
    Ok(())
}
