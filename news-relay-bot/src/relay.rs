//! Channel post delivery: rewrite a post and forward it to the destination chat.
//!
//! Shared by the push handler (Bot API channel posts) and the watched-channel poller.

use std::sync::Arc;

use telegram_bot::{parse_message_id, Bot, Chat, MediaFlags, Message};
use tracing::{debug, info, instrument, warn};

use crate::destination::Destination;
use crate::error::RelayError;
use crate::media::media_suffix;
use crate::pipeline::RelayPipeline;

/// A channel post reduced to what delivery needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPost {
    pub channel_id: i64,
    pub message_id: i32,
    /// Text or caption.
    pub text: Option<String>,
    /// Channel title, used as the source label.
    pub title: Option<String>,
    pub media: MediaFlags,
    pub edited: bool,
}

impl ChannelPost {
    /// `None` for non-channel messages or ids that are not Telegram message ids.
    pub fn from_message(message: &Message) -> Option<Self> {
        if !message.chat.is_channel() {
            return None;
        }
        let message_id = parse_message_id(&message.id).ok()?;
        Some(Self {
            channel_id: message.chat.id,
            message_id,
            text: Some(message.content.clone()).filter(|t| !t.trim().is_empty()),
            title: message.chat.title.clone(),
            media: message.media,
            edited: message.edited,
        })
    }
}

pub struct ChannelRelay {
    pipeline: Arc<RelayPipeline>,
    bot: Arc<dyn Bot>,
    destination: Destination,
}

impl ChannelRelay {
    pub fn new(pipeline: Arc<RelayPipeline>, bot: Arc<dyn Bot>, destination: Destination) -> Self {
        Self {
            pipeline,
            bot,
            destination,
        }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn pipeline(&self) -> &Arc<RelayPipeline> {
        &self.pipeline
    }

    /// Rewrites and delivers one post. `fallback_target` is used when no destination is
    /// configured. Returns the delivered text, or `None` for posts without text.
    ///
    /// The destination is probed before the rewrite; an unreachable destination costs no
    /// backend call. The destination chat id keys the style and the last input, which is recorded
    /// only after the send succeeds.
    #[instrument(skip(self, post), fields(channel_id = post.channel_id, message_id = post.message_id, edited = post.edited))]
    pub async fn relay_post(
        &self,
        post: &ChannelPost,
        fallback_target: Option<i64>,
    ) -> Result<Option<String>, RelayError> {
        let Some(text) = post.text.as_deref() else {
            debug!("Post has no text or caption, skipped");
            return Ok(None);
        };
        let target = self
            .destination
            .target_or(fallback_target)
            .ok_or(RelayError::ConfigMissing("DEST_CHAT_ID"))?;
        let chat = Chat::with_id(target);

        if !self.bot.can_send(&chat).await {
            warn!(target, "Destination probe failed, delivery suppressed");
            return Err(RelayError::DestinationUnreachable(target));
        }

        let rewritten = self
            .pipeline
            .rewrite_inbound(target, text, post.title.as_deref())
            .await?;
        let outbound = format!("{}{}", rewritten, media_suffix(&post.media));

        if let Err(e) = self.bot.send_message(&chat, &outbound).await {
            warn!(target, error = %e, "Send to destination failed");
            return Err(RelayError::DestinationUnreachable(target));
        }
        self.pipeline
            .remember_input(target, text, post.title.as_deref())
            .await;
        info!(target, outbound_len = outbound.len(), "Post delivered");
        Ok(Some(outbound))
    }

    /// Startup diagnostic: `None` when no destination is configured, else the probe result.
    pub async fn probe_destination(&self) -> Option<bool> {
        let target = self.destination.chat_id()?;
        let ok = self.bot.can_send(&Chat::with_id(target)).await;
        Some(ok)
    }
}
