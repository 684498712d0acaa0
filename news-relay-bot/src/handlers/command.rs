//! Bot commands in private and group chats: /start, /me, /style, /revise, /check, /paraphrase.
//!
//! Plain private text (no command) is rewritten like `/paraphrase <text>`.

use std::sync::Arc;

use async_trait::async_trait;
use telegram_bot::{Bot, Chat, Handler, HandlerResponse, Message, Result};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::destination::Destination;
use crate::pipeline::RelayPipeline;

pub const MSG_HELP: &str = "Hi! Send me a news text or reply to a message with /paraphrase and I will rewrite it. \
You can also set a style: /style <instructions>.\n\
To revise the last result use: /revise <what to change>.";
pub const MSG_STYLE_UPDATED: &str = "Style updated.";
pub const MSG_STYLE_UNSET: &str = "No style set. Set one with: /style <text>";
pub const MSG_REVISE_USAGE: &str = "Tell me what to change: /revise <what to change>";
pub const MSG_NO_DESTINATION: &str = "Destination chat is not set (DEST_CHAT_ID / TARGET_CHAT_ID).";
pub const MSG_CHECK_OK: &str = "OK: I can post there.";
pub const MSG_CHECK_NO: &str = "NO: I cannot post there. Make sure you pressed /start in the bot or granted it rights in the channel.";
pub const MSG_PARAPHRASE_USAGE: &str = "Usage: reply to a message with /paraphrase or pass the text as an argument.";

/// A command split into name, optional `@botname` addressee, and argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub name: &'a str,
    pub addressee: Option<&'a str>,
    pub args: &'a str,
}

/// Parses `/name[@bot] args`. `None` when the text is not a command.
pub fn parse_command(text: &str) -> Option<ParsedCommand<'_>> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], rest[i..].trim()),
        None => (rest, ""),
    };
    let (name, addressee) = match head.split_once('@') {
        Some((name, bot)) => (name, Some(bot)),
        None => (head, None),
    };
    if name.is_empty() {
        return None;
    }
    Some(ParsedCommand {
        name,
        addressee,
        args,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Me,
    Style,
    Revise,
    Check,
    Paraphrase,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "start" | "help" => Some(Self::Start),
            "me" => Some(Self::Me),
            "style" => Some(Self::Style),
            "revise" => Some(Self::Revise),
            "check" => Some(Self::Check),
            "paraphrase" => Some(Self::Paraphrase),
            _ => None,
        }
    }
}

pub struct CommandHandler {
    pipeline: Arc<RelayPipeline>,
    bot: Arc<dyn Bot>,
    destination: Destination,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl CommandHandler {
    pub fn new(
        pipeline: Arc<RelayPipeline>,
        bot: Arc<dyn Bot>,
        destination: Destination,
        bot_username: Arc<RwLock<Option<String>>>,
    ) -> Self {
        Self {
            pipeline,
            bot,
            destination,
            bot_username,
        }
    }

    /// False for `/cmd@otherbot`; true when unaddressed or our username is unknown.
    async fn addressed_to_us(&self, addressee: Option<&str>) -> bool {
        match (addressee, self.bot_username.read().await.as_deref()) {
            (Some(target), Some(ours)) => target.eq_ignore_ascii_case(ours),
            _ => true,
        }
    }

    async fn style(&self, chat_id: i64, args: &str) -> String {
        if args.is_empty() {
            return self
                .pipeline
                .settings()
                .get_style(chat_id)
                .await
                .unwrap_or_else(|| MSG_STYLE_UNSET.to_string());
        }
        self.pipeline.settings().set_style(chat_id, Some(args)).await;
        MSG_STYLE_UPDATED.to_string()
    }

    async fn revise(&self, chat_id: i64, args: &str) -> String {
        if args.is_empty() {
            return MSG_REVISE_USAGE.to_string();
        }
        self.pipeline
            .revise(chat_id, args)
            .await
            .unwrap_or_else(|e| {
                warn!(chat_id, error = %e, "Revision failed");
                e.user_message()
            })
    }

    async fn check(&self) -> String {
        let Some(target) = self.destination.chat_id() else {
            return MSG_NO_DESTINATION.to_string();
        };
        if self.bot.can_send(&Chat::with_id(target)).await {
            MSG_CHECK_OK.to_string()
        } else {
            MSG_CHECK_NO.to_string()
        }
    }

    /// Replied-to text/caption first, then the argument text.
    async fn paraphrase(&self, message: &Message, args: &str) -> String {
        let text = message
            .reply_to_message_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(Some(args).filter(|a| !a.is_empty()));
        let Some(text) = text else {
            return MSG_PARAPHRASE_USAGE.to_string();
        };
        self.rewrite_for_chat(message.chat.id, text).await
    }

    async fn rewrite_for_chat(&self, chat_id: i64, text: &str) -> String {
        self.pipeline
            .process_inbound_text(chat_id, text, None)
            .await
            .unwrap_or_else(|e| {
                warn!(chat_id, error = %e, "Paraphrase failed");
                e.user_message()
            })
    }

    async fn respond(&self, message: &Message, text: String) -> Result<HandlerResponse> {
        self.bot.reply_to(message, &text).await?;
        Ok(HandlerResponse::Reply(text))
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.chat.is_channel() {
            return Ok(HandlerResponse::Continue);
        }

        let Some(cmd) = parse_command(&message.content) else {
            if message.chat.chat_type == "private" && !message.content.trim().is_empty() {
                let reply = self.rewrite_for_chat(message.chat.id, &message.content).await;
                return self.respond(message, reply).await;
            }
            return Ok(HandlerResponse::Continue);
        };
        if !self.addressed_to_us(cmd.addressee).await {
            return Ok(HandlerResponse::Ignore);
        }
        let Some(command) = Command::from_name(cmd.name) else {
            return Ok(HandlerResponse::Ignore);
        };
        info!(command = ?command, args_len = cmd.args.len(), "Command received");

        let chat_id = message.chat.id;
        let reply = match command {
            Command::Start => MSG_HELP.to_string(),
            Command::Me => format!("Your user_id: {}", message.user.id),
            Command::Style => self.style(chat_id, cmd.args).await,
            Command::Revise => self.revise(chat_id, cmd.args).await,
            Command::Check => self.check().await,
            Command::Paraphrase => self.paraphrase(message, cmd.args).await,
        };
        self.respond(message, reply).await
    }
}
