//! [`ChannelSource`] over the Bot API.
//!
//! The Bot API has no history call, so the latest post of a channel is the last one the push
//! handler recorded in [`PostSnapshots`]. Resolution and access checks use `getChat`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use teloxide::RequestError;
use tokio::sync::RwLock;

use super::source::{ChannelSource, SourceError};
use crate::relay::ChannelPost;

/// Latest known post per channel.
#[derive(Clone, Default)]
pub struct PostSnapshots {
    inner: Arc<RwLock<HashMap<i64, ChannelPost>>>,
}

impl PostSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the post with the highest message id; an edit of that post replaces it.
    pub async fn record(&self, post: ChannelPost) {
        let mut inner = self.inner.write().await;
        let newer = inner
            .get(&post.channel_id)
            .map_or(true, |known| post.message_id >= known.message_id);
        if newer {
            inner.insert(post.channel_id, post);
        }
    }

    pub async fn latest(&self, channel_id: i64) -> Option<ChannelPost> {
        self.inner.read().await.get(&channel_id).cloned()
    }
}

pub struct BotApiChannelSource {
    bot: teloxide::Bot,
    snapshots: PostSnapshots,
}

impl BotApiChannelSource {
    pub fn new(bot: teloxide::Bot, snapshots: PostSnapshots) -> Self {
        Self { bot, snapshots }
    }
}

fn to_source_error(e: RequestError) -> SourceError {
    match e {
        RequestError::Api(api) => SourceError::PeerUnavailable(api.to_string()),
        other => SourceError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ChannelSource for BotApiChannelSource {
    async fn resolve(&self, handle: &str) -> Result<i64, SourceError> {
        let chat = self
            .bot
            .get_chat(Recipient::ChannelUsername(format!("@{}", handle)))
            .await
            .map_err(to_source_error)?;
        Ok(chat.id.0)
    }

    async fn check_access(&self, channel_id: i64) -> Result<(), SourceError> {
        self.bot
            .get_chat(ChatId(channel_id))
            .await
            .map(|_| ())
            .map_err(to_source_error)
    }

    async fn latest_post(&self, channel_id: i64) -> Result<Option<ChannelPost>, SourceError> {
        Ok(self.snapshots.latest(channel_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telegram_bot::MediaFlags;

    fn post(channel_id: i64, message_id: i32, text: &str) -> ChannelPost {
        ChannelPost {
            channel_id,
            message_id,
            text: Some(text.to_string()),
            title: None,
            media: MediaFlags::default(),
            edited: false,
        }
    }

    #[tokio::test]
    async fn test_snapshots_keep_newest_and_accept_edits() {
        let snapshots = PostSnapshots::new();
        snapshots.record(post(-1, 10, "first")).await;
        snapshots.record(post(-1, 9, "older")).await;
        assert_eq!(snapshots.latest(-1).await.unwrap().text.as_deref(), Some("first"));

        snapshots.record(post(-1, 10, "edited")).await;
        assert_eq!(snapshots.latest(-1).await.unwrap().text.as_deref(), Some("edited"));

        assert!(snapshots.latest(-2).await.is_none());
    }
}
