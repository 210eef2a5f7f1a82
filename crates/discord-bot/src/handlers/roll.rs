use chrono::{DateTime, Utc};
use eyre::Result;
use ppbot_core::roll::{
    self, PendingReroll, REROLL_PROMPT_SECONDS, RerollAnswer, Roll, RollModifiers, format_remaining, size_bar,
};
use serenity::model::{
    channel::Message,
    id::{ChannelId, GuildId},
};
use serenity::utils::Color;
use ppbot_db::SizeRepository;
use tracing::{error, info};

use super::{HandlerContext, display_name, user_error};
use crate::announce::announce_achievement;
use crate::roles::sync_title_role;
use crate::services::rolls::{self, RollStart};
use crate::state::rng;

/// Where a roll is being finished.
#[derive(Debug, Clone, Copy)]
struct RollSite {
    channel_id: ChannelId,
    guild_id: GuildId,
    user_id: u64,
    in_roll_off: bool,
}

/// `pls pp`
pub async fn handle_pp(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guild_id = super::require_guild(msg)?;
    let user_id = msg.author.id.0;
    let now = Utc::now();

    if handler_ctx.state.rerolls.read().await.contains(user_id) {
        return Err(user_error("Answer your reroll prompt first: `yes` or `no`."));
    }

    let in_roll_off = handler_ctx.state.roll_off_running_in(msg.channel_id.0, now).await;
    let event = handler_ctx.state.event_modifier(now).await;
    let mut rng = rng();

    let start = rolls::start_roll(handler_ctx.store(), user_id, now, event, in_roll_off, &mut rng).await?;
    let site = RollSite {
        channel_id: msg.channel_id,
        guild_id,
        user_id,
        in_roll_off,
    };

    match start {
        RollStart::CoolingDown { next_roll_at, remaining } => {
            msg.reply(
                &handler_ctx.ctx,
                format!(
                    "⏳ You already rolled this hour. Try again in **{}** (<t:{}:t>).",
                    format_remaining(remaining),
                    next_roll_at.timestamp()
                ),
            )
            .await?;
            Ok(())
        }
        RollStart::Rolled {
            roll,
            modifiers,
            reroll_offered: true,
        } => offer_reroll(handler_ctx, msg, site, roll, modifiers, now).await,
        RollStart::Rolled { roll, modifiers, .. } => {
            finish_roll(handler_ctx, site, roll, &modifiers, now, None).await
        }
    }
}

async fn offer_reroll(
    handler_ctx: &HandlerContext,
    msg: &Message,
    site: RollSite,
    first: Roll,
    modifiers: RollModifiers,
    rolled_at: DateTime<Utc>,
) -> Result<()> {
    let prompted_at = Utc::now();
    let pending = PendingReroll {
        first,
        modifiers,
        channel_id: site.channel_id.0,
        guild_id: site.guild_id.0,
        rolled_at,
        prompted_at,
        in_roll_off: site.in_roll_off,
    };

    let opened = handler_ctx
        .state
        .rerolls
        .write()
        .await
        .open(site.user_id, pending);
    if !opened {
        return Err(user_error("Answer your reroll prompt first: `yes` or `no`."));
    }

    msg.reply(
        &handler_ctx.ctx,
        format!(
            "🎲 You rolled **{} inches** `{}`.\nYour Reroll Token is active. Reroll? Reply `yes` or `no` within {} seconds.",
            first.size,
            size_bar(first.size),
            REROLL_PROMPT_SECONDS
        ),
    )
    .await?;

    let handler_ctx = handler_ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(REROLL_PROMPT_SECONDS as u64)).await;

        let expired = handler_ctx
            .state
            .rerolls
            .write()
            .await
            .expire(site.user_id, prompted_at);
        let Some(pending) = expired else {
            return;
        };

        let note = "No answer, so you keep your first roll.";
        let finished = finish_roll(
            &handler_ctx,
            site,
            pending.first,
            &pending.modifiers,
            pending.rolled_at,
            Some(note),
        )
        .await;
        if let Err(e) = finished {
            error!("Failed to finish timed-out reroll for {}: {:?}", site.user_id, e);
        }
    });

    Ok(())
}

/// Handles `yes`/`no` to an open reroll prompt. Returns false if the user had
/// no prompt open in this channel.
pub async fn handle_reroll_answer(handler_ctx: &HandlerContext, msg: &Message, answer: RerollAnswer) -> Result<bool> {
    let taken = handler_ctx
        .state
        .rerolls
        .write()
        .await
        .take(msg.channel_id.0, msg.author.id.0);
    let Some(pending) = taken else {
        return Ok(false);
    };

    let site = RollSite {
        channel_id: msg.channel_id,
        guild_id: GuildId(pending.guild_id),
        user_id: msg.author.id.0,
        in_roll_off: pending.in_roll_off,
    };

    let (roll, note) = match answer {
        RerollAnswer::Yes => {
            let reroll = roll::roll(&mut rng(), &pending.modifiers);
            let note = format!("Rerolled! Your first roll was {} inches.", pending.first.size);
            (reroll, note)
        }
        RerollAnswer::No => (pending.first, "You kept your first roll.".to_string()),
    };

    finish_roll(handler_ctx, site, roll, &pending.modifiers, pending.rolled_at, Some(&note)).await?;
    Ok(true)
}

fn size_color(size: i32) -> Color {
    match size {
        0..=4 => Color::RED,
        5..=9 => Color::ORANGE,
        10..=14 => Color::GOLD,
        15..=19 => Color::FOOYOO,
        _ => Color::PURPLE,
    }
}

/// Saves the roll under the time it was made and tells everyone about it.
async fn finish_roll(
    handler_ctx: &HandlerContext,
    site: RollSite,
    roll: Roll,
    modifiers: &RollModifiers,
    rolled_at: DateTime<Utc>,
    note: Option<&str>,
) -> Result<()> {
    let commit = rolls::commit_roll(handler_ctx.store(), site.user_id, roll, rolled_at).await?;

    let new_best = site.in_roll_off
        && handler_ctx
            .state
            .record_roll_off_score(site.channel_id.0, site.user_id, commit.size, rolled_at)
            .await;

    let name = display_name(&handler_ctx.ctx, Some(site.guild_id), site.user_id).await;
    let mut details = modifiers.labels();
    if roll.base != commit.size {
        details.insert(0, format!("base roll {}", roll.base));
    }

    let mut description = format!("`{}`\n**{} inches**", size_bar(commit.size), commit.size);
    if !details.is_empty() {
        description.push_str(&format!("\n*{}*", details.join(", ")));
    }
    if let Some(note) = note {
        description.push_str(&format!("\n{note}"));
    }
    if site.in_roll_off {
        description.push_str(if new_best {
            "\n🏁 New personal best in the roll-off!"
        } else {
            "\n🏁 Not your best roll-off score."
        });
    }

    site.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("📏 {name}'s size"))
                    .description(description)
                    .color(size_color(commit.size))
                    .footer(|f| f.text(format!("+{} coins · balance {}", commit.coins_earned, commit.balance)))
            })
        })
        .await?;
    info!("User {} rolled {}", site.user_id, commit.size);

    if let Some(achievement) = &commit.achievement {
        if let Err(e) =
            announce_achievement(handler_ctx, site.channel_id, Some(site.guild_id), site.user_id, achievement).await
        {
            error!("Failed to announce achievement: {:?}", e);
        }
    }

    if let Err(e) = sync_title_role(handler_ctx, site.guild_id).await {
        error!("Failed to sync title role: {:?}", e);
    }

    Ok(())
}

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// `pls leaderboard`
pub async fn handle_leaderboard(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let entries = handler_ctx.store().top_sizes(5).await?;
    if entries.is_empty() {
        msg.reply(
            &handler_ctx.ctx,
            format!("Nobody has rolled yet. Be the first with `{}pp`!", handler_ctx.prefix()),
        )
        .await?;
        return Ok(());
    }

    let mut lines = Vec::with_capacity(entries.len());
    for (rank, entry) in entries.iter().enumerate() {
        let name = display_name(&handler_ctx.ctx, msg.guild_id, entry.user_id).await;
        let place = MEDALS
            .get(rank)
            .map(|medal| medal.to_string())
            .unwrap_or_else(|| format!("**{}.**", rank + 1));
        lines.push(format!("{place} **{name}**: {} inches `{}`", entry.size, size_bar(entry.size)));
    }

    let cadence = handler_ctx.config.reset_cadence;
    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🏆 Leaderboard")
                    .description(lines.join("\n"))
                    .color(Color::GOLD)
                    .footer(|f| f.text(format!("Resets {cadence} at midnight. The leader holds the title role.")))
            })
        })
        .await?;

    Ok(())
}
