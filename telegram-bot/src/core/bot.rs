//! Bot abstraction for sending messages.
//!
//! [`Bot`] is transport-agnostic; the teloxide implementation lives in
//! [`crate::telegram::TelegramBotAdapter`]. Tests substitute a recording mock.

use async_trait::async_trait;

use crate::core::error::{DbotError, Result};
use crate::core::types::{Chat, Message};

/// Sends text to chats and probes whether a chat accepts messages.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply in the chat the message came from.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Permission probe: sends a "typing" chat action. Never fails; errors mean `false`.
    async fn can_send(&self, chat: &Chat) -> bool;
}

/// Parses a transport message id ("123") into the numeric Telegram id.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id: {}", s)))
}
