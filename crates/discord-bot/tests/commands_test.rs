use std::collections::HashSet;

use pretty_assertions::assert_eq;
use ppbot_discord_bot::commands::help::{category_text, usage_line};
use ppbot_discord_bot::commands::{COMMANDS, Category, CommandKind, Parse, find, parse};
use rstest::rstest;

#[rstest]
#[case("pls pp", CommandKind::Pp, "")]
#[case("PLS PP", CommandKind::Pp, "")]
#[case("  pls lb", CommandKind::Leaderboard, "")]
#[case("pls bal", CommandKind::Coins, "")]
#[case("pls bj 50", CommandKind::Blackjack, "50")]
#[case("pls consume Shrink Ray <@42>", CommandKind::Use, "Shrink Ray <@42>")]
#[case("pls ppoff   5  ", CommandKind::PpOff, "5")]
#[case("pls inv", CommandKind::Inventory, "")]
fn test_parse_commands(#[case] content: &str, #[case] kind: CommandKind, #[case] args: &str) {
    match parse("pls ", content) {
        Parse::Command(command) => {
            assert_eq!(command.spec.kind, kind);
            assert_eq!(command.args, args);
        }
        other => panic!("expected a command for {content:?}, got {other:?}"),
    }
}

#[rstest]
#[case("hello there")]
#[case("pls")]
#[case("pls ")]
#[case("plsx pp")]
#[case("")]
fn test_parse_not_commands(#[case] content: &str) {
    assert_eq!(parse("pls ", content), Parse::NotCommand);
}

#[test]
fn test_parse_unknown_command() {
    assert_eq!(parse("pls ", "pls dance now"), Parse::Unknown("dance"));
}

#[test]
fn test_parse_custom_prefix() {
    let Parse::Command(command) = parse("!", "!help") else {
        panic!("expected !help to parse");
    };
    assert_eq!(command.spec.kind, CommandKind::Help);
    assert_eq!(parse("!", "pls help"), Parse::NotCommand);
}

#[test]
fn test_names_and_aliases_are_unique() {
    let mut seen = HashSet::new();
    for spec in COMMANDS.iter() {
        for name in std::iter::once(&spec.name).chain(spec.aliases.iter()) {
            assert!(seen.insert(*name), "duplicate command name {name}");
        }
    }
}

#[test]
fn test_find_by_alias() {
    assert_eq!(find("balance").map(|spec| spec.kind), Some(CommandKind::Coins));
    assert_eq!(find("prof").map(|spec| spec.kind), Some(CommandKind::Profile));
    assert!(find("nope").is_none());
}

#[test]
fn test_game_commands_are_guild_only() {
    for kind in [
        CommandKind::Pp,
        CommandKind::Trivia,
        CommandKind::Blackjack,
        CommandKind::Duel,
        CommandKind::PpOff,
    ] {
        let spec = COMMANDS.iter().find(|spec| spec.kind == kind).unwrap();
        assert!(spec.guild_only, "{} should be guild only", spec.name);
    }
    assert!(!find("help").unwrap().guild_only);
}

#[test]
fn test_help_lists_every_command() {
    let text: String = Category::ALL
        .iter()
        .map(|category| category_text("pls ", *category))
        .collect::<Vec<_>>()
        .join("\n");

    for spec in COMMANDS.iter() {
        assert!(text.contains(&format!("`pls {}", spec.name)), "help is missing {}", spec.name);
    }
}

#[test]
fn test_usage_line() {
    let spec = find("use").unwrap();
    assert_eq!(usage_line("pls ", spec), "`pls use <item> [@user]` (consume)");

    let spec = find("ping").unwrap();
    assert_eq!(usage_line("!", spec), "`!ping`");
}
