use chrono::Utc;
use eyre::Result;
use ppbot_core::games::highlow::HighLow;
use ppbot_core::games::mathrush::MathProblem;
use ppbot_core::games::scramble::Scramble;
use ppbot_core::games::trivia::{TriviaQuestion, pick_topic};
use ppbot_core::games::wyr::{self, OPTION_A_EMOJI, OPTION_B_EMOJI};
use ppbot_core::games::{ActiveRound, GameKind, Puzzle, Submission, format_cooldown};
use ppbot_core::schedule::to_std;
use serenity::builder::CreateEmbed;
use serenity::model::{
    channel::{Message, ReactionType},
    id::{ChannelId, GuildId, MessageId},
};
use serenity::utils::Color;
use tracing::{error, info, warn};

use super::{HandlerContext, reply_briefly, require_guild, user_error};
use crate::announce::announce_achievement;
use crate::services::rewards::{self, GameReward};
use crate::state::rng;

async fn ensure_no_round(handler_ctx: &HandlerContext, channel_id: ChannelId, kind: GameKind) -> Result<()> {
    if handler_ctx
        .state
        .games
        .read()
        .await
        .active_message(channel_id.0, kind)
        .is_some()
    {
        return Err(user_error(format!(
            "There's already a {} running in this channel!",
            kind.display_name()
        )));
    }
    Ok(())
}

/// Posts the round and registers it. If another round of the same kind
/// slipped in meanwhile, the new post is withdrawn.
async fn open_round(
    handler_ctx: &HandlerContext,
    channel_id: ChannelId,
    guild_id: GuildId,
    puzzle: Puzzle,
    embed: CreateEmbed,
) -> Result<()> {
    let kind = puzzle.kind();
    let sent = channel_id
        .send_message(&handler_ctx.ctx.http, |m| m.set_embed(embed))
        .await?;

    let round = ActiveRound::new(puzzle, guild_id.0, sent.id.0, Utc::now());
    let opened = handler_ctx.state.games.write().await.open(channel_id.0, round);
    if opened.is_err() {
        sent.delete(&handler_ctx.ctx).await?;
        return Err(user_error(format!(
            "There's already a {} running in this channel!",
            kind.display_name()
        )));
    }

    spawn_round_timeout(handler_ctx.clone(), channel_id, kind, sent.id);
    Ok(())
}

fn spawn_round_timeout(handler_ctx: HandlerContext, channel_id: ChannelId, kind: GameKind, message_id: MessageId) {
    tokio::spawn(async move {
        tokio::time::sleep(to_std(kind.timeout())).await;

        let expired = handler_ctx
            .state
            .games
            .write()
            .await
            .expire(channel_id.0, kind, message_id.0);
        let Some(round) = expired else {
            return;
        };

        if kind == GameKind::Trivia {
            handler_ctx.state.trivia_cooldowns.write().await.clear(round.guild_id);
        }

        let solution = round.puzzle.solution();
        let result = channel_id
            .send_message(&handler_ctx.ctx.http, |m| {
                m.embed(|e| {
                    e.title("⏰ Time's up!")
                        .description(format!(
                            "Nobody got the {}. The answer was **{solution}**.",
                            kind.display_name()
                        ))
                        .color(Color::RED)
                })
            })
            .await;
        if let Err(e) = result {
            error!("Failed to announce {} timeout: {:?}", kind.display_name(), e);
        }
    });
}

/// `pls trivia`
pub async fn handle_trivia(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guild_id = require_guild(msg)?;

    let cooldown = handler_ctx
        .state
        .trivia_cooldowns
        .read()
        .await
        .remaining(guild_id.0, Utc::now());
    if let Some(remaining) = cooldown {
        return Err(user_error(format!(
            "🧠 Trivia is cooling down. Next question in {}.",
            format_cooldown(remaining)
        )));
    }
    ensure_no_round(handler_ctx, msg.channel_id, GameKind::Trivia).await?;

    let (category, difficulty) = pick_topic(&mut rng());
    let api_question = handler_ctx
        .trivia
        .fetch_question(category, difficulty)
        .await
        .map_err(|e| {
            warn!("Trivia API request failed: {:?}", e);
            user_error("I couldn't fetch a trivia question right now. Try again in a bit.")
        })?;
    let question = TriviaQuestion::from_api(api_question, difficulty, &mut rng());

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("🧠 Trivia: {}", question.category_display()))
        .description(format!("**{}**\n\n{}", question.question, question.choices_text()))
        .field(
            "Difficulty",
            format!("{} {}", question.difficulty_emoji(), question.difficulty_display()),
            true,
        )
        .color(Color::BLUE)
        .footer(|f| {
            f.text(format!(
                "Type A, B, C or D. One guess each, {} seconds!",
                GameKind::Trivia.timeout().num_seconds()
            ))
        });

    open_round(handler_ctx, msg.channel_id, guild_id, Puzzle::Trivia(question), embed).await
}

/// `pls scramble`
pub async fn handle_scramble(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guild_id = require_guild(msg)?;
    ensure_no_round(handler_ctx, msg.channel_id, GameKind::Scramble).await?;

    let scramble = Scramble::new(&mut rng());
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("🔤 Word Scramble {}", scramble.difficulty_emoji()))
        .description(format!("Unscramble this word:\n\n**{}**", scramble.scrambled.to_uppercase()))
        .color(Color::TEAL)
        .footer(|f| {
            f.text(format!(
                "First to type the word wins! {} seconds.",
                GameKind::Scramble.timeout().num_seconds()
            ))
        });

    open_round(handler_ctx, msg.channel_id, guild_id, Puzzle::Scramble(scramble), embed).await
}

/// `pls highlow`
pub async fn handle_highlow(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guild_id = require_guild(msg)?;
    ensure_no_round(handler_ctx, msg.channel_id, GameKind::HighLow).await?;

    let game = HighLow::new(&mut rng());
    let mut embed = CreateEmbed::default();
    embed
        .title("🔢 Higher or Lower?")
        .description(format!(
            "The number is **{}**.\nIs the next number (1-100) higher or lower?",
            game.current
        ))
        .color(Color::ORANGE)
        .footer(|f| {
            f.text(format!(
                "Type h or l. One guess each, {} seconds!",
                GameKind::HighLow.timeout().num_seconds()
            ))
        });

    open_round(handler_ctx, msg.channel_id, guild_id, Puzzle::HighLow(game), embed).await
}

/// `pls mathrush`
pub async fn handle_mathrush(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let guild_id = require_guild(msg)?;
    ensure_no_round(handler_ctx, msg.channel_id, GameKind::MathRush).await?;

    let problem = MathProblem::new(&mut rng());
    let mut embed = CreateEmbed::default();
    embed
        .title("🧮 Math Rush")
        .description(format!("Quick! What is **{}**?", problem.text))
        .color(Color::MAGENTA)
        .footer(|f| {
            f.text(format!(
                "First correct answer wins! {} seconds.",
                GameKind::MathRush.timeout().num_seconds()
            ))
        });

    open_round(handler_ctx, msg.channel_id, guild_id, Puzzle::MathRush(problem), embed).await
}

/// `pls wyr`
pub async fn handle_wyr(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let (option_a, option_b) = wyr::pick(&mut rng());

    let sent = msg
        .channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🤔 Would You Rather...")
                    .description(format!("{OPTION_A_EMOJI} {option_a}\n\n**OR**\n\n{OPTION_B_EMOJI} {option_b}"))
                    .color(Color::BLURPLE)
                    .footer(|f| f.text("Vote with the reactions below!"))
            })
        })
        .await?;

    for emoji in [OPTION_A_EMOJI, OPTION_B_EMOJI] {
        sent.react(&handler_ctx.ctx, ReactionType::Unicode(emoji.to_string()))
            .await?;
    }
    Ok(())
}

/// Checks a plain chat message against the rounds open in its channel.
pub async fn handle_answer(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let submission = handler_ctx
        .state
        .games
        .write()
        .await
        .submit(msg.channel_id.0, msg.author.id.0, &msg.content);

    match submission {
        None => Ok(()),
        Some(Submission::Missed {
            kind: GameKind::HighLow,
            solution_hint: Some(next),
        }) => reply_briefly(handler_ctx, msg, format!("❌ Wrong! The next number was **{next}**. That was your one guess.")).await,
        Some(Submission::Missed { .. }) => {
            reply_briefly(handler_ctx, msg, "❌ Wrong answer! That was your one guess.").await
        }
        Some(Submission::Won(round)) => round_won(handler_ctx, msg, guild_id, round).await,
    }
}

async fn round_won(handler_ctx: &HandlerContext, msg: &Message, guild_id: GuildId, round: ActiveRound) -> Result<()> {
    let user_id = msg.author.id.0;
    let kind = round.puzzle.kind();
    let mut lines = vec![format!(
        "✅ <@{user_id}> got it! The answer was **{}**.",
        round.puzzle.solution()
    )];

    let mut achievement = None;
    if kind == GameKind::Trivia {
        handler_ctx
            .state
            .trivia_cooldowns
            .write()
            .await
            .record_win(guild_id.0, Utc::now());
        let record = rewards::record_trivia_win(handler_ctx.store(), user_id).await?;
        lines.push(format!("That's trivia win #{}.", record.wins));
        achievement = record.achievement;
    }

    let reward = rewards::pay_game_reward(handler_ctx.store(), user_id, &mut rng()).await?;
    lines.extend(reward_lines(&reward));
    info!("User {} won a {}", user_id, kind.display_name());

    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🎉 Winner!")
                    .description(lines.join("\n"))
                    .color(Color::FOOYOO)
            })
        })
        .await?;

    if let Some(achievement) = achievement {
        announce_achievement(handler_ctx, msg.channel_id, Some(guild_id), user_id, &achievement).await?;
    }
    Ok(())
}

pub fn reward_lines(reward: &GameReward) -> Vec<String> {
    let mut lines = vec![format!("💰 +{} coins (balance {})", reward.coins, reward.balance)];
    if let Some((item, rarity)) = &reward.item {
        lines.push(format!("🎁 You found a **{}**! {}", item.name, rarity.label()));
    }
    lines
}
