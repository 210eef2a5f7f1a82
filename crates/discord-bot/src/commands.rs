//! Prefix command table and parser.
//!
//! Every command the bot answers is listed in [`COMMANDS`]; the help embed is
//! generated from the same table.

pub mod help;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Rolling,
    Items,
    Games,
    Utility,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Rolling, Category::Items, Category::Games, Category::Utility];

    pub fn title(self) -> &'static str {
        match self {
            Category::Rolling => "📏 Rolling",
            Category::Items => "🎒 Items & Coins",
            Category::Games => "🎮 Games",
            Category::Utility => "🔧 Utility",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Pp,
    Leaderboard,
    Profile,
    Coins,
    Inventory,
    Use,
    Shop,
    Buy,
    Trivia,
    Scramble,
    HighLow,
    MathRush,
    Wyr,
    Blackjack,
    Hit,
    Stand,
    Duel,
    Accept,
    PpOff,
    Help,
    Info,
    Ping,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Arguments shown after the name in help, e.g. `<item> [@user]`.
    pub usage: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub guild_only: bool,
}

impl CommandSpec {
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

const fn spec(
    kind: CommandKind,
    name: &'static str,
    aliases: &'static [&'static str],
    usage: &'static str,
    description: &'static str,
    category: Category,
    guild_only: bool,
) -> CommandSpec {
    CommandSpec {
        kind,
        name,
        aliases,
        usage,
        description,
        category,
        guild_only,
    }
}

pub static COMMANDS: [CommandSpec; 22] = [
    spec(CommandKind::Pp, "pp", &[], "", "Roll your size for this hour", Category::Rolling, true),
    spec(CommandKind::Leaderboard, "leaderboard", &["lb"], "", "Show the top 5 sizes", Category::Rolling, true),
    spec(CommandKind::PpOff, "ppoff", &[], "[minutes]", "Start a timed roll-off, best roll wins", Category::Rolling, true),
    spec(CommandKind::Profile, "profile", &["prof"], "[@user]", "Show size, stats, coins and achievements", Category::Items, false),
    spec(CommandKind::Coins, "coins", &["balance", "bal"], "[@user]", "Show a coin balance", Category::Items, false),
    spec(CommandKind::Inventory, "inventory", &["inv"], "", "List your items", Category::Items, false),
    spec(CommandKind::Use, "use", &["consume"], "<item> [@user]", "Use an item from your inventory", Category::Items, true),
    spec(CommandKind::Shop, "shop", &[], "", "Show items for sale", Category::Items, false),
    spec(CommandKind::Buy, "buy", &[], "<item>", "Buy an item with coins", Category::Items, false),
    spec(CommandKind::Trivia, "trivia", &[], "", "Answer a multiple choice question", Category::Games, true),
    spec(CommandKind::Scramble, "scramble", &[], "", "Unscramble a word", Category::Games, true),
    spec(CommandKind::HighLow, "highlow", &[], "", "Guess if the next number is higher or lower", Category::Games, true),
    spec(CommandKind::MathRush, "mathrush", &[], "", "Solve a quick sum", Category::Games, true),
    spec(CommandKind::Wyr, "wyr", &[], "", "Would you rather...", Category::Games, true),
    spec(CommandKind::Blackjack, "blackjack", &["bj"], "[bet]", "Play blackjack for coins", Category::Games, true),
    spec(CommandKind::Hit, "hit", &[], "", "Draw a card in blackjack", Category::Games, true),
    spec(CommandKind::Stand, "stand", &[], "", "Stand in blackjack", Category::Games, true),
    spec(CommandKind::Duel, "duel", &[], "@user", "Challenge someone to a roll duel", Category::Games, true),
    spec(CommandKind::Accept, "accept", &[], "@user", "Accept a duel challenge", Category::Games, true),
    spec(CommandKind::Help, "help", &[], "", "Show this list", Category::Utility, false),
    spec(CommandKind::Info, "info", &[], "", "About the bot", Category::Utility, false),
    spec(CommandKind::Ping, "ping", &[], "", "Check the bot's latency", Category::Utility, false),
];

pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.matches(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub spec: &'static CommandSpec,
    pub name: &'a str,
    /// Everything after the command name, trimmed.
    pub args: &'a str,
}

impl PartialEq for CommandSpec {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for CommandSpec {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parse<'a> {
    /// Not addressed to the bot.
    NotCommand,
    /// Prefixed, but no such command.
    Unknown(&'a str),
    Command(ParsedCommand<'a>),
}

/// Splits `content` into a command and its arguments. The prefix and the
/// command name are matched case-insensitively.
pub fn parse<'a>(prefix: &str, content: &'a str) -> Parse<'a> {
    let content = content.trim_start();
    let Some(head) = content.get(..prefix.len()) else {
        return Parse::NotCommand;
    };
    if prefix.is_empty() || !head.eq_ignore_ascii_case(prefix) {
        return Parse::NotCommand;
    }

    let rest = content[prefix.len()..].trim_start();
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Parse::NotCommand;
    }

    match find(&name.to_lowercase()) {
        Some(spec) => Parse::Command(ParsedCommand { spec, name, args }),
        None => Parse::Unknown(name),
    }
}
