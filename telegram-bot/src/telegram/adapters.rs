//! Conversions from teloxide types to core types.

use crate::core::{Chat, MediaFlags, Message, MessageDirection, ToCoreMessage, ToCoreUser, User};

/// Converts a teloxide user to a core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Converts a teloxide message (private, group or channel post) to a core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

fn chat_type(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_channel() {
        "channel"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else {
        "unknown"
    }
}

/// Text of a message, or its caption for media messages.
fn text_or_caption(msg: &teloxide::types::Message) -> Option<&str> {
    msg.text().or_else(|| msg.caption())
}

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        Message {
            id: msg.id.0.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_default(),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: chat_type(&msg.chat).to_string(),
                title: msg.chat.title().map(str::to_string),
            },
            content: text_or_caption(msg).unwrap_or("").to_string(),
            direction: MessageDirection::Incoming,
            created_at: msg.date,
            edited: msg.edit_date().is_some(),
            media: MediaFlags {
                photo: msg.photo().is_some(),
                video: msg.video().is_some(),
                animation: msg.animation().is_some(),
            },
            reply_to_message_id: msg.reply_to_message().map(|r| r.id.0.to_string()),
            reply_to_message_content: msg
                .reply_to_message()
                .and_then(text_or_caption)
                .map(str::to_string),
        }
    }
}
