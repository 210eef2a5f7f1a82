use rand::Rng;
use rand::seq::SliceRandom;

pub const SCENARIOS: [(&str, &str); 15] = [
    ("have the ability to fly", "be invisible"),
    ("fight 100 duck-sized horses", "fight 1 horse-sized duck"),
    ("always win at games but never improve", "always lose but get better every time"),
    ("have unlimited coins", "have unlimited items"),
    ("know all languages", "be able to talk to animals"),
    ("live in the past", "live in the future"),
    ("be a master at every game", "be a master chef"),
    ("have super strength", "have super speed"),
    ("never need to sleep", "never need to eat"),
    ("always be 10 minutes late", "always be 20 minutes early"),
    ("have a rewind button for life", "have a pause button for life"),
    ("be famous but poor", "be rich but unknown"),
    ("explore space", "explore the ocean depths"),
    ("have a pet dragon", "have a pet unicorn"),
    ("win every duel", "win every trivia"),
];

pub const OPTION_A_EMOJI: &str = "🅰️";
pub const OPTION_B_EMOJI: &str = "🅱️";

pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> (String, String) {
    let (a, b) = SCENARIOS.choose(rng).copied().unwrap_or(SCENARIOS[0]);
    (title_case(a), title_case(b))
}

pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
