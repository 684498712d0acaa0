//! Message, direction and media types for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// Direction of the message (from user or from bot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// Which media kinds are attached to a message. Only presence matters, never the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFlags {
    pub photo: bool,
    pub video: bool,
    pub animation: bool,
}

/// A single message with user, chat, content, and optional reply context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// Sender; id 0 for channel posts, which have no user author.
    pub user: User,
    pub chat: Chat,
    /// Text, or the caption of a media message; empty when neither is present.
    pub content: String,
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
    /// True for `edited_message` / `edited_channel_post` updates.
    pub edited: bool,
    pub media: MediaFlags,
    pub reply_to_message_id: Option<String>,
    /// Text or caption of the replied-to message.
    pub reply_to_message_content: Option<String>,
}
