use chrono::Utc;
use eyre::Result;
use ppbot_core::games::duel::{AcceptError, ChallengeError, DUEL_TIMEOUT_SECONDS, DuelOutcome};
use ppbot_core::roll::size_bar;
use serenity::model::channel::Message;
use serenity::utils::Color;
use tracing::{error, info};

use super::{HandlerContext, display_name, first_mention, require_guild, user_error};
use crate::announce::announce_achievement;
use crate::services::{rewards, rolls};
use crate::state::rng;

fn challenge_error_text(error: ChallengeError, target: u64) -> String {
    match error {
        ChallengeError::SelfChallenge => "You can't duel yourself!".to_string(),
        ChallengeError::AlreadyChallenged => format!("You already challenged <@{target}>. Give them a moment."),
        ChallengeError::ChallengerBusy => "You're already part of a pending duel.".to_string(),
        ChallengeError::TargetBusy => format!("<@{target}> is already part of a pending duel."),
    }
}

/// `pls duel @user`
pub async fn handle_duel(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    require_guild(msg)?;
    let target = first_mention(msg)
        .ok_or_else(|| user_error(format!("Mention who you want to duel: `{}duel @user`", handler_ctx.prefix())))?;
    if target.bot {
        return Err(user_error("Bots don't duel."));
    }

    let challenger = msg.author.id.0;
    let challenged = target.id.0;
    let issued_at = Utc::now();

    handler_ctx
        .state
        .duels
        .write()
        .await
        .challenge(challenger, challenged, issued_at)
        .map_err(|e| user_error(challenge_error_text(e, challenged)))?;
    info!("User {} challenged {} to a duel", challenger, challenged);

    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.content(format!("<@{challenged}>"))
                .embed(|e| {
                    e.title("⚔️ Duel challenge!")
                        .description(format!(
                            "<@{challenger}> challenges <@{challenged}> to a size duel!\nType `{}accept @{}` within {} seconds.",
                            handler_ctx.prefix(),
                            msg.author.name,
                            DUEL_TIMEOUT_SECONDS
                        ))
                        .color(Color::DARK_RED)
                })
        })
        .await?;

    let handler_ctx = handler_ctx.clone();
    let channel_id = msg.channel_id;
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(DUEL_TIMEOUT_SECONDS as u64)).await;

        let expired = handler_ctx.state.duels.write().await.expire(challenged, issued_at);
        if expired.is_none() {
            return;
        }

        let result = channel_id
            .say(
                &handler_ctx.ctx.http,
                format!("⌛ <@{challenged}> didn't accept the duel from <@{challenger}> in time."),
            )
            .await;
        if let Err(e) = result {
            error!("Failed to announce expired duel: {:?}", e);
        }
    });

    Ok(())
}

/// `pls accept @user`
pub async fn handle_accept(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guild_id = require_guild(msg)?;
    let challenger = first_mention(msg)
        .map(|user| user.id.0)
        .ok_or_else(|| user_error(format!("Mention who you're accepting: `{}accept @user`", handler_ctx.prefix())))?;
    let acceptor = msg.author.id.0;
    let now = Utc::now();

    handler_ctx
        .state
        .duels
        .write()
        .await
        .accept(acceptor, challenger, now)
        .map_err(|e| match e {
            AcceptError::NoPendingDuel => user_error("Nobody has challenged you, or the challenge expired."),
            AcceptError::WrongChallenger { actual } => {
                user_error(format!("Your pending duel is from <@{actual}>, not <@{challenger}>."))
            }
        })?;

    let event = handler_ctx.state.event_modifier(now).await;
    let mut rng = rng();
    let challenger_roll = rolls::duel_roll(handler_ctx.store(), challenger, event.clone(), &mut rng).await?;
    let acceptor_roll = rolls::duel_roll(handler_ctx.store(), acceptor, event, &mut rng).await?;

    let challenger_name = display_name(&handler_ctx.ctx, Some(guild_id), challenger).await;
    let acceptor_name = display_name(&handler_ctx.ctx, Some(guild_id), acceptor).await;
    let mut lines = vec![
        format!("**{challenger_name}**: {} inches `{}`", challenger_roll.size, size_bar(challenger_roll.size)),
        format!("**{acceptor_name}**: {} inches `{}`", acceptor_roll.size, size_bar(acceptor_roll.size)),
        String::new(),
    ];

    let winner = match DuelOutcome::decide(challenger_roll.size, acceptor_roll.size) {
        DuelOutcome::ChallengerWins => Some((challenger, challenger_name)),
        DuelOutcome::AcceptorWins => Some((acceptor, acceptor_name)),
        DuelOutcome::Draw => None,
    };

    let mut achievement = None;
    let color = match &winner {
        Some((winner_id, winner_name)) => {
            let record = rewards::record_duel_win(handler_ctx.store(), *winner_id).await?;
            lines.push(format!("🏆 **{winner_name}** wins! ({} duel wins)", record.wins));
            achievement = record.achievement.map(|a| (*winner_id, a));
            info!("Duel {} vs {} won by {}", challenger, acceptor, winner_id);
            Color::GOLD
        }
        None => {
            lines.push("🤝 It's a draw!".to_string());
            Color::LIGHT_GREY
        }
    };

    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| e.title("⚔️ Duel results").description(lines.join("\n")).color(color))
        })
        .await?;

    if let Some((winner_id, achievement)) = achievement {
        announce_achievement(handler_ctx, msg.channel_id, Some(guild_id), winner_id, &achievement).await?;
    }

    Ok(())
}
