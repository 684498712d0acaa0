//! Watched-channel client seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::relay::ChannelPost;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The channel is gone, private, or the bot lost access.
    #[error("peer unavailable: {0}")]
    PeerUnavailable(String),

    /// Network or server failure; the channel may work on the next tick.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Read access to channels the bot watches without being their publisher.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// Resolves a normalized handle (no `@`) to a channel id.
    async fn resolve(&self, handle: &str) -> Result<i64, SourceError>;

    async fn check_access(&self, channel_id: i64) -> Result<(), SourceError>;

    /// Most recent post of the channel, if any is known.
    async fn latest_post(&self, channel_id: i64) -> Result<Option<ChannelPost>, SourceError>;
}
