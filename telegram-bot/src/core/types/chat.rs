//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Chat identity: private chat, group, supergroup or channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// `private`, `group`, `supergroup`, `channel`, or `unknown` for chats known only by id.
    pub chat_type: String,
    /// Title of groups and channels; used as the source label of channel posts.
    pub title: Option<String>,
}

impl Chat {
    /// A chat known only by its id (e.g. a configured destination).
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            chat_type: "unknown".to_string(),
            title: None,
        }
    }

    pub fn is_channel(&self) -> bool {
        self.chat_type == "channel"
    }
}
