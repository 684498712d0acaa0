//! Bot API channel posts (`channel_post`, `edited_channel_post`).
//!
//! New posts are claimed in the delivery ledger so the poller never delivers them twice. The
//! claim is confirmed after delivery and released on failure, leaving the post to the next
//! poller scan. Edits bypass the claim and are delivered again. Failures are logged, never
//! returned to the dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use telegram_bot::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, instrument, warn};

use crate::relay::{ChannelPost, ChannelRelay};
use crate::watcher::{DeliveryLedger, PostSnapshots};

pub struct ChannelPostHandler {
    relay: Arc<ChannelRelay>,
    ledger: DeliveryLedger,
    snapshots: PostSnapshots,
}

impl ChannelPostHandler {
    pub fn new(relay: Arc<ChannelRelay>, ledger: DeliveryLedger, snapshots: PostSnapshots) -> Self {
        Self {
            relay,
            ledger,
            snapshots,
        }
    }
}

#[async_trait]
impl Handler for ChannelPostHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(post) = ChannelPost::from_message(message) else {
            return Ok(HandlerResponse::Continue);
        };
        self.snapshots.record(post.clone()).await;

        if post.text.is_none() {
            debug!("Channel post without text or caption");
            return Ok(HandlerResponse::Stop);
        }
        if !post.edited && !self.ledger.claim(post.channel_id, post.message_id).await {
            debug!("Channel post already delivered or in progress");
            return Ok(HandlerResponse::Stop);
        }
        match self.relay.relay_post(&post, Some(post.channel_id)).await {
            Ok(Some(delivered)) => {
                self.ledger.confirm(post.channel_id, post.message_id).await;
                Ok(HandlerResponse::Reply(delivered))
            }
            Ok(None) => {
                self.ledger.release(post.channel_id, post.message_id).await;
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                if !post.edited {
                    self.ledger
                        .settle_failure(post.channel_id, post.message_id, e.is_retryable())
                        .await;
                }
                warn!(channel_id = post.channel_id, error = %e, "Channel post relay failed, left for the poller");
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
