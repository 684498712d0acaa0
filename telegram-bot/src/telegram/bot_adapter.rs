//! Wraps teloxide::Bot and implements [`crate::core::Bot`].

use crate::config::BaseConfig;
use crate::core::{Bot as CoreBot, Chat, DbotError, Message, Result};
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatAction, ChatId},
};
use tracing::warn;

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

/// Builds a teloxide Bot from the token, pointing it at a custom API server when configured.
pub fn build_teloxide_bot(config: &BaseConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(&config.bot_token);
    match &config.telegram_api_url {
        Some(url) => {
            let url = reqwest::Url::parse(url)
                .map_err(|e| DbotError::Config(format!("Invalid Telegram API URL {}: {}", url, e)))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn can_send(&self, chat: &Chat) -> bool {
        match self
            .bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(chat_id = chat.id, error = %e, "Chat does not accept messages from the bot");
                false
            }
        }
    }
}
