use eyre::Result;
use ppbot_core::games::blackjack::{BlackjackGame, DEFAULT_BET, Outcome, format_hand};
use serenity::model::{channel::Message, id::ChannelId};
use serenity::utils::Color;
use tracing::{info, warn};

use super::{HandlerContext, require_guild, user_error};
use crate::services::economy;
use crate::state::{TableError, TableMove, rng};

fn parse_bet(args: &str) -> Result<i64> {
    match args.split_whitespace().next() {
        None => Ok(DEFAULT_BET),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| user_error(format!("**{raw}** isn't a valid bet. Use a whole number of coins."))),
    }
}

fn outcome_text(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Blackjack => "🃏 Blackjack!",
        Outcome::Win => "🎉 You win!",
        Outcome::Lose => "😞 Dealer wins.",
        Outcome::Bust => "💥 Bust!",
        Outcome::Push => "🤝 Push, your bet is returned.",
    }
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Blackjack | Outcome::Win => Color::FOOYOO,
        Outcome::Push => Color::LIGHT_GREY,
        Outcome::Lose | Outcome::Bust => Color::RED,
    }
}

async fn show_table(handler_ctx: &HandlerContext, channel_id: ChannelId, game: &BlackjackGame) -> Result<()> {
    let player = format!("{}\nValue: **{}**", format_hand(&game.player, false), game.player_value());
    let dealer = format!("{}\nShowing: **{}**", format_hand(&game.dealer, true), game.dealer_showing());
    let prefix = handler_ctx.prefix();

    channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("🃏 Blackjack: {} coin bet", game.bet))
                    .field("Your hand", player, true)
                    .field("Dealer", dealer, true)
                    .color(Color::DARK_GREEN)
                    .footer(|f| f.text(format!("{prefix}hit or {prefix}stand")))
            })
        })
        .await?;
    Ok(())
}

/// Pays out and shows the final table.
async fn finish_game(
    handler_ctx: &HandlerContext,
    channel_id: ChannelId,
    user_id: u64,
    game: &BlackjackGame,
    outcome: Outcome,
) -> Result<()> {
    let (payout, balance) = economy::settle_bet(handler_ctx.store(), user_id, outcome, game.bet).await?;
    info!("Blackjack for {} ended {:?}, paid {}", user_id, outcome, payout);

    let player = format!("{}\nValue: **{}**", format_hand(&game.player, false), game.player_value());
    let dealer = format!("{}\nValue: **{}**", format_hand(&game.dealer, false), game.dealer_value());
    let summary = format!("{}\nPayout: **{payout}** coins · Balance: **{balance}**", outcome_text(outcome));

    channel_id
        .send_message(&handler_ctx.ctx.http, |m| {
            m.embed(|e| {
                e.title(format!("🃏 Blackjack: {} coin bet", game.bet))
                    .description(summary)
                    .field("Your hand", player, true)
                    .field("Dealer", dealer, true)
                    .color(outcome_color(outcome))
            })
        })
        .await?;
    Ok(())
}

/// `pls blackjack [bet]`
pub async fn handle_blackjack(handler_ctx: &HandlerContext, msg: &Message, args: &str) -> Result<()> {
    require_guild(msg)?;
    let user_id = msg.author.id.0;
    let bet = parse_bet(args)?;

    if handler_ctx.state.blackjack.read().await.contains_key(&user_id) {
        return Err(user_error(format!(
            "You already have a game going. Use `{0}hit` or `{0}stand`.",
            handler_ctx.prefix()
        )));
    }

    let bet = economy::place_bet(handler_ctx.store(), user_id, bet).await?;
    let game = BlackjackGame::deal(bet, msg.channel_id.0, &mut rng());

    if game.is_natural() {
        let outcome = game.settle_natural();
        return finish_game(handler_ctx, msg.channel_id, user_id, &game, outcome).await;
    }

    let table = game.clone();
    if handler_ctx.state.seat_blackjack(user_id, game).await.is_err() {
        economy::refund_bet(handler_ctx.store(), user_id, bet).await?;
        warn!("Refunded {} coins to {} after a concurrent blackjack start", bet, user_id);
        return Err(user_error(format!(
            "You already have a game going. Use `{0}hit` or `{0}stand`.",
            handler_ctx.prefix()
        )));
    }

    show_table(handler_ctx, msg.channel_id, &table).await
}

fn table_error(handler_ctx: &HandlerContext, err: TableError) -> eyre::Report {
    match err {
        TableError::NoGame => user_error(format!(
            "You don't have a game going. Start one with `{}blackjack [bet]`.",
            handler_ctx.prefix()
        )),
        TableError::OtherChannel(channel_id) => user_error(format!("Your game is in <#{channel_id}>. Play it there.")),
    }
}

/// `pls hit`
pub async fn handle_hit(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let user_id = msg.author.id.0;
    let played = handler_ctx
        .state
        .blackjack_hit(user_id, msg.channel_id.0)
        .await
        .map_err(|e| table_error(handler_ctx, e))?;

    match played {
        TableMove::Continue(table) => show_table(handler_ctx, msg.channel_id, &table).await,
        TableMove::Finished(game, outcome) => finish_game(handler_ctx, msg.channel_id, user_id, &game, outcome).await,
    }
}

/// `pls stand`
pub async fn handle_stand(handler_ctx: &HandlerContext, msg: &Message) -> Result<()> {
    let user_id = msg.author.id.0;
    let (game, outcome) = handler_ctx
        .state
        .blackjack_stand(user_id, msg.channel_id.0)
        .await
        .map_err(|e| table_error(handler_ctx, e))?;
    finish_game(handler_ctx, msg.channel_id, user_id, &game, outcome).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", DEFAULT_BET)]
    #[case("25", 25)]
    #[case("  5 extra", 5)]
    fn parses_bets(#[case] args: &str, #[case] expected: i64) {
        assert_eq!(parse_bet(args).unwrap(), expected);
    }

    #[test]
    fn rejects_non_numeric_bets() {
        assert!(parse_bet("lots").is_err());
    }
}
