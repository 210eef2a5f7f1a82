//! Long-running loops started once the gateway is ready: the hourly server
//! event clock and the leaderboard reset.

use std::time::Duration as StdDuration;

use chrono::Utc;
use eyre::Result;
use ppbot_core::events::{self, EventTick};
use ppbot_core::schedule::{next_reset, to_std, until_next_hour};
use ppbot_db::EffectRepository;
use serenity::model::id::ChannelId;
use serenity::utils::Color;
use tracing::{debug, error, info};

use crate::handlers::HandlerContext;
use crate::services::reset::{ResetSummary, run_reset};
use crate::state::rng;

/// Runs just past the hour so the new hour has clearly begun.
const TICK_SLACK: StdDuration = StdDuration::from_secs(1);

pub fn spawn_background_tasks(handler_ctx: HandlerContext) {
    let events_ctx = handler_ctx.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(to_std(until_next_hour(Utc::now())) + TICK_SLACK).await;
            if let Err(e) = event_tick(&events_ctx).await {
                error!("Hourly event check failed: {:?}", e);
            }
        }
    });

    tokio::spawn(async move {
        loop {
            let config = &handler_ctx.config;
            let at = next_reset(Utc::now(), config.timezone, config.reset_cadence);
            info!("Next leaderboard reset at {}", at);
            tokio::time::sleep(to_std(at - Utc::now()) + TICK_SLACK).await;

            if let Err(e) = reset_tick(&handler_ctx).await {
                error!("Leaderboard reset failed: {:?}", e);
            }
        }
    });
}

fn announcement_channel(handler_ctx: &HandlerContext) -> Option<ChannelId> {
    handler_ctx.config.announcement_channel_id.map(ChannelId)
}

async fn event_tick(handler_ctx: &HandlerContext) -> Result<()> {
    let purged = handler_ctx.store().purge_expired_effects().await?;
    if purged > 0 {
        debug!("Purged {} expired effects", purged);
    }

    let tick = {
        let mut current = handler_ctx.state.event.write().await;
        events::tick(&mut current, Utc::now(), handler_ctx.config.timezone, &mut rng())
    };

    let (title, description, event) = match tick {
        EventTick::Started(active) => {
            info!("Server event started: {}", active.event.name);
            let description = format!(
                "{}\n\nEnds <t:{}:R>.",
                active.event.start_message,
                active.ends_at.timestamp()
            );
            ("🌟 Server event", description, active)
        }
        EventTick::Ended(active) => {
            info!("Server event ended: {}", active.event.name);
            ("Event over", active.event.end_message.to_string(), active)
        }
        EventTick::Continuing { remaining } => {
            debug!("Server event continues for {} more minutes", remaining.num_minutes());
            return Ok(());
        }
        EventTick::QuietHours | EventTick::NothingHappened => return Ok(()),
    };

    let Some(channel_id) = announcement_channel(handler_ctx) else {
        return Ok(());
    };

    channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("{title}: {}", event.event.name))
                    .description(description)
                    .color(Color::new(event.event.color))
            })
        })
        .await?;
    Ok(())
}

async fn reset_tick(handler_ctx: &HandlerContext) -> Result<()> {
    let ResetSummary { champion, cleared } = run_reset(handler_ctx.store()).await?;

    let Some(channel_id) = announcement_channel(handler_ctx) else {
        return Ok(());
    };

    if let Some(champion) = &champion {
        channel_id
            .send_message(&handler_ctx.ctx.http, |m| {
                m.embed(|e| {
                    e.title("👑 Champion crowned")
                        .description(format!(
                            "<@{}> finished on top with **{} inches**!\nTimes holding the title: **{}**",
                            champion.user_id, champion.size, champion.days_as_title_holder
                        ))
                        .color(Color::GOLD)
                })
            })
            .await?;

        if let Some(achievement) = &champion.achievement {
            crate::announce::announce_achievement(handler_ctx, channel_id, None, champion.user_id, achievement)
                .await?;
        }
    }

    let cadence = handler_ctx.config.reset_cadence;
    channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🔄 Leaderboard reset")
                    .description(format!(
                        "The {cadence} leaderboard has been wiped ({cleared} sizes cleared). Start rolling!"
                    ))
                    .color(Color::BLUE)
            })
        })
        .await?;
    Ok(())
}
