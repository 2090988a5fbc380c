//! Operator commands addressed to the bot.

use eunomia_domain::nick_eq;

/// A command given in the channel (`<botnick>: command`) or in private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Re-read the legislation rules and apply them to the next message
    ReloadLegislation,
    Status,
    Version,
    Unknown(String),
}

impl BotCommand {
    /// Parse the command word; `None` for an empty message.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        Some(match word.to_ascii_lowercase().as_str() {
            "reload-legislation" => BotCommand::ReloadLegislation,
            "status" => BotCommand::Status,
            "version" => BotCommand::Version,
            _ => BotCommand::Unknown(word.to_string()),
        })
    }
}

/// The remainder of a channel message addressed as `nick: text` or
/// `nick, text` to `bot_nick`.
pub fn addressed_to<'a>(text: &'a str, bot_nick: &str) -> Option<&'a str> {
    let (target, rest) = text.split_once([':', ','])?;
    if !nick_eq(target.trim(), bot_nick) {
        return None;
    }
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}
