use crate::domain::{ChatId, UserId};

/// How the messenger should interpret reply text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    MarkdownV2,
}

/// Messenger-neutral inbound message.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub sender: Option<UserId>,
    pub text: String,
    /// Lowercased command name without `/` or `@botname`; `None` for plain text.
    pub command: Option<String>,
    /// Bot named in `/cmd@botname`, as written.
    pub mention: Option<String>,
    pub args: Vec<String>,
}

impl InboundMessage {
    pub fn new(chat_id: ChatId, sender: Option<UserId>, text: impl Into<String>) -> Self {
        let text = text.into();
        let (command, mention, args) = match parse_command(&text) {
            Some(parsed) => (Some(parsed.name), parsed.mention, parsed.args),
            None => (None, None, Vec::new()),
        };
        Self {
            chat_id,
            sender,
            text,
            command,
            mention,
            args,
        }
    }

    /// False only for `/cmd@otherbot`: commands without a mention reach every bot.
    pub fn is_addressed_to(&self, bot_username: &str) -> bool {
        self.mention
            .as_deref()
            .map_or(true, |m| m.eq_ignore_ascii_case(bot_username))
    }
}

struct ParsedCommand {
    name: String,
    mention: Option<String>,
    args: Vec<String>,
}

/// Split `/cmd@botname arg1 arg2` into name, mention and arguments.
fn parse_command(text: &str) -> Option<ParsedCommand> {
    if !text.starts_with('/') {
        return None;
    }

    let mut parts = text.split_whitespace();
    let first = parts.next().unwrap_or("").trim_start_matches('/');
    let (name, mention) = match first.split_once('@') {
        Some((name, bot)) => (name, Some(bot.to_string()).filter(|b| !b.is_empty())),
        None => (first, None),
    };
    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        name: name.to_lowercase(),
        mention,
        args: parts.map(str::to_string).collect(),
    })
}
