use serenity::builder::CreateEmbed;
use serenity::utils::Color;

use super::{COMMANDS, Category, CommandSpec};

/// `pls use <item> [@user] (consume)`
pub fn usage_line(prefix: &str, spec: &CommandSpec) -> String {
    let mut line = format!("`{prefix}{}", spec.name);
    if !spec.usage.is_empty() {
        line.push(' ');
        line.push_str(spec.usage);
    }
    line.push('`');
    if !spec.aliases.is_empty() {
        line.push_str(&format!(" ({})", spec.aliases.join(", ")));
    }
    line
}

/// Help text for one category, one command per line.
pub fn category_text(prefix: &str, category: Category) -> String {
    COMMANDS
        .iter()
        .filter(|spec| spec.category == category)
        .map(|spec| format!("{} - {}", usage_line(prefix, spec), spec.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn help_embed(prefix: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📖 Commands")
        .description(format!("Every command starts with `{prefix}`."))
        .color(Color::BLURPLE);

    for category in Category::ALL {
        embed.field(category.title(), category_text(prefix, category), false);
    }

    embed.footer(|f| f.text("Game answers are typed straight into the channel, no prefix needed."));
    embed
}
