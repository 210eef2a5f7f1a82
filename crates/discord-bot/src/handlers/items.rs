use chrono::Utc;
use eyre::Result;
use ppbot_core::models::item::{item_query, parse_user_mention};
use ppbot_core::rewards::Rarity;
use ppbot_db::{CoinRepository, ItemRepository};
use serenity::model::channel::Message;
use serenity::utils::Color;

use super::HandlerContext;
use crate::services::economy::{self, UseOutcome};

/// `pls inventory`
pub async fn handle_inventory(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let inventory = handler_ctx.store().inventory(msg.author.id.0).await?;
    if inventory.is_empty() {
        msg.reply(
            &handler_ctx.ctx,
            format!(
                "🎒 Your inventory is empty. Win minigames or check the `{}shop`.",
                handler_ctx.prefix()
            ),
        )
        .await?;
        return Ok(());
    }

    let lines: Vec<String> = inventory
        .iter()
        .map(|entry| format!("**{}** x{}\n{}", entry.name, entry.quantity, entry.description))
        .collect();

    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("🎒 {}'s inventory", msg.author.name))
                    .description(lines.join("\n\n"))
                    .color(Color::DARK_GREEN)
                    .footer(|f| f.text(format!("Use an item with {}use <item>", handler_ctx.prefix())))
            })
        })
        .await?;

    Ok(())
}

/// `pls use <item> [@user]`
pub async fn handle_use(handler_ctx: &HandlerContext, msg: &Message, args: &str) -> Result<()> {
    let user_id = msg.author.id.0;
    let target = msg
        .mentions
        .first()
        .map(|user| user.id.0)
        .or_else(|| args.split_whitespace().find_map(parse_user_mention));
    let query = item_query(args);

    let outcome = economy::use_item(handler_ctx.store(), user_id, &query, target, Utc::now()).await?;

    let text = match outcome {
        UseOutcome::Boosted { item, until } => format!(
            "🧪 You used **{}**! Your rolls get +{} until <t:{}:t>.",
            item.name,
            item.effect_value,
            until.timestamp()
        ),
        UseOutcome::LuckArmed { item, draws, until } => format!(
            "🧦 You put on the **{}**! Your next roll before <t:{}:t> keeps the best of {} draws.",
            item.name,
            until.timestamp(),
            draws
        ),
        UseOutcome::RerollArmed { item, until } => format!(
            "🎲 **{}** armed! Roll with `{}pp` before <t:{}:t> to get a reroll prompt.",
            item.name,
            handler_ctx.prefix(),
            until.timestamp()
        ),
        UseOutcome::Shrunk { item, target, old, new } => format!(
            "🔫 You zapped <@{target}> with the **{}**! Their size went from {old} to {new} inches.",
            item.name
        ),
        UseOutcome::Used { item } => format!("✨ You used **{}**.", item.name),
    };

    msg.reply(&handler_ctx.ctx, text).await?;
    Ok(())
}

/// `pls shop`
pub async fn handle_shop(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let items = handler_ctx.store().list_items().await?;
    let lines: Vec<String> = items
        .iter()
        .filter_map(|item| {
            item.price.map(|price| {
                format!(
                    "**{}** - {price} coins ({})\n{}",
                    item.name,
                    Rarity::of(item).label(),
                    item.description
                )
            })
        })
        .collect();

    if lines.is_empty() {
        msg.reply(&handler_ctx.ctx, "🛒 The shop is empty right now.").await?;
        return Ok(());
    }

    let balance = handler_ctx.store().balance(msg.author.id.0).await?;
    msg.channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title("🛒 Shop")
                    .description(lines.join("\n\n"))
                    .color(Color::BLUE)
                    .footer(|f| {
                        f.text(format!(
                            "You have {balance} coins. Buy with {}buy <item>",
                            handler_ctx.prefix()
                        ))
                    })
            })
        })
        .await?;

    Ok(())
}

/// `pls buy <item>`
pub async fn handle_buy(handler_ctx: &HandlerContext, msg: &Message, args: &str) -> Result<()> {
    let purchase = economy::buy_item(handler_ctx.store(), msg.author.id.0, args).await?;

    msg.reply(
        &handler_ctx.ctx,
        format!(
            "🛍️ You bought a **{}** for {} coins. You have {} left.",
            purchase.item.name, purchase.price, purchase.balance
        ),
    )
    .await?;
    Ok(())
}
