use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::Result;
use ppbot_core::errors::BotError;
use ppbot_core::roll::RerollAnswer;
use ppbot_db::Store;
use serenity::{
    async_trait,
    model::{
        channel::Message,
        gateway::{Activity, Ready},
        id::{ChannelId, GuildId, UserId},
    },
    prelude::*,
};
use tracing::{debug, error, info};

pub mod blackjack;
pub mod duel;
pub mod items;
pub mod minigames;
pub mod ppoff;
pub mod profile;
pub mod roll;
pub mod utility;

use crate::commands::{self, CommandKind, Parse, ParsedCommand};
use crate::config::BotConfig;
use crate::state::BotState;
use crate::tasks;
use crate::trivia_client::TriviaClient;

/// Seconds before a short-lived reply (wrong answers and the like) is removed.
const BRIEF_REPLY_SECONDS: u64 = 10;

/// Main Discord handler that processes all events.
pub struct Handler {
    config: Arc<BotConfig>,
    store: Arc<dyn Store>,
    state: Arc<BotState>,
    trivia: TriviaClient,
    tasks_started: AtomicBool,
}

impl Handler {
    pub fn new(config: BotConfig, store: Arc<dyn Store>) -> Self {
        let trivia = TriviaClient::new(config.trivia_api_url());
        Self {
            config: Arc::new(config),
            store,
            state: Arc::new(BotState::new()),
            trivia,
            tasks_started: AtomicBool::new(false),
        }
    }

    fn context(&self, ctx: Context) -> HandlerContext {
        HandlerContext {
            ctx,
            config: self.config.clone(),
            store: self.store.clone(),
            state: self.state.clone(),
            trivia: self.trivia.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        ctx.set_activity(Activity::playing(format!("{}help", self.config.command_prefix())))
            .await;

        // Reconnects fire `ready` again; the loops only start once.
        if !self.tasks_started.swap(true, Ordering::SeqCst) {
            tasks::spawn_background_tasks(self.context(ctx));
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let handler_ctx = self.context(ctx);
        if let Err(e) = route_message(&handler_ctx, &msg).await {
            report_error(&handler_ctx, &msg, e).await;
        }
    }
}

/// Shared context for command handlers.
#[derive(Clone)]
pub struct HandlerContext {
    pub ctx: Context,
    pub config: Arc<BotConfig>,
    pub store: Arc<dyn Store>,
    pub state: Arc<BotState>,
    pub trivia: TriviaClient,
}

impl HandlerContext {
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn prefix(&self) -> &str {
        self.config.command_prefix()
    }

    /// The configured announcement channel, or `fallback` when none is set.
    pub fn announce_channel(&self, fallback: ChannelId) -> ChannelId {
        self.config
            .announcement_channel_id
            .map(ChannelId)
            .unwrap_or(fallback)
    }
}

/// Reroll answers first, then prefix commands, then minigame answers.
async fn route_message(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    if let Some(answer) = RerollAnswer::parse(&msg.content) {
        if roll::handle_reroll_answer(handler_ctx, msg, answer).await? {
            return Ok(());
        }
    }

    match commands::parse(handler_ctx.prefix(), &msg.content) {
        Parse::Command(command) => {
            info!("Received command: {} from {}", command.spec.name, msg.author.id);
            if command.spec.guild_only && msg.guild_id.is_none() {
                return Err(user_error("That command only works in a server."));
            }
            dispatch(handler_ctx, msg, command).await
        }
        Parse::Unknown(name) => {
            debug!("Ignoring unknown command: {}", name);
            Ok(())
        }
        Parse::NotCommand => minigames::handle_answer(handler_ctx, msg).await,
    }
}

async fn dispatch(handler_ctx: &HandlerContext, msg: &Message, command: ParsedCommand<'_>) -> Result<()> {
    let args = command.args;
    match command.spec.kind {
        CommandKind::Pp => roll::handle_pp(handler_ctx, msg).await,
        CommandKind::Leaderboard => roll::handle_leaderboard(handler_ctx, msg).await,
        CommandKind::Profile => profile::handle_profile(handler_ctx, msg).await,
        CommandKind::Coins => profile::handle_coins(handler_ctx, msg).await,
        CommandKind::Inventory => items::handle_inventory(handler_ctx, msg).await,
        CommandKind::Use => items::handle_use(handler_ctx, msg, args).await,
        CommandKind::Shop => items::handle_shop(handler_ctx, msg).await,
        CommandKind::Buy => items::handle_buy(handler_ctx, msg, args).await,
        CommandKind::Trivia => minigames::handle_trivia(handler_ctx, msg).await,
        CommandKind::Scramble => minigames::handle_scramble(handler_ctx, msg).await,
        CommandKind::HighLow => minigames::handle_highlow(handler_ctx, msg).await,
        CommandKind::MathRush => minigames::handle_mathrush(handler_ctx, msg).await,
        CommandKind::Wyr => minigames::handle_wyr(handler_ctx, msg).await,
        CommandKind::Blackjack => blackjack::handle_blackjack(handler_ctx, msg, args).await,
        CommandKind::Hit => blackjack::handle_hit(handler_ctx, msg).await,
        CommandKind::Stand => blackjack::handle_stand(handler_ctx, msg).await,
        CommandKind::Duel => duel::handle_duel(handler_ctx, msg).await,
        CommandKind::Accept => duel::handle_accept(handler_ctx, msg).await,
        CommandKind::PpOff => ppoff::handle_ppoff(handler_ctx, msg, args).await,
        CommandKind::Help => utility::handle_help(handler_ctx, msg).await,
        CommandKind::Info => utility::handle_info(handler_ctx, msg).await,
        CommandKind::Ping => utility::handle_ping(handler_ctx, msg).await,
    }
}

/// Validation errors are the user's to read; anything else is logged and
/// answered with an apology.
async fn report_error(handler_ctx: &HandlerContext, msg: &Message, e: eyre::Report) {
    let reply = match e.downcast_ref::<BotError>() {
        Some(BotError::Validation(text)) => text.clone(),
        _ => {
            error!("Error handling message {}: {:?}", msg.id, e);
            "Sorry, something went wrong on my end. Please try again in a bit.".to_string()
        }
    };

    if let Err(why) = msg.reply(&handler_ctx.ctx, reply).await {
        error!("Failed to send error response: {:?}", why);
    }
}

/// An error whose message is shown to the user as-is.
pub fn user_error(text: impl Into<String>) -> eyre::Report {
    BotError::Validation(text.into()).into()
}

pub fn require_guild(msg: &Message) -> Result<GuildId> {
    msg.guild_id
        .ok_or_else(|| user_error("That command only works in a server."))
}

/// Nickname in the guild if there is one, else the account name.
pub async fn display_name(ctx: &Context, guild_id: Option<GuildId>, user_id: u64) -> String {
    if let Some(guild_id) = guild_id {
        if let Ok(member) = guild_id.member(ctx, UserId(user_id)).await {
            return member.display_name().to_string();
        }
    }

    match UserId(user_id).to_user(ctx).await {
        Ok(user) => user.name,
        Err(_) => format!("User {user_id}"),
    }
}

/// Replies, then deletes the reply after a few seconds.
pub async fn reply_briefly(handler_ctx: &HandlerContext, msg: &Message, text: impl std::fmt::Display) -> Result<()> {
    let reply = msg.reply(&handler_ctx.ctx, text).await?;

    let ctx = handler_ctx.ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(BRIEF_REPLY_SECONDS)).await;
        if let Err(why) = reply.delete(&ctx).await {
            debug!("Could not delete brief reply: {:?}", why);
        }
    });

    Ok(())
}

/// First mentioned user, if any.
pub fn first_mention(msg: &Message) -> Option<&serenity::model::user::User> {
    msg.mentions.first()
}
