//! Watched-channel poller.
//!
//! Every interval: for each watched channel check access (a peer failure drops the channel),
//! fetch the latest post, skip it if already delivered, otherwise relay it. A post whose
//! delivery failed is retried on the next scan. A failure on one channel never stops the scan
//! of the others. Shutdown is checked between scans only, so a running scan always completes.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use telegram_bot::{InFlightTracker, ShutdownSignal};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::ledger::DeliveryLedger;
use super::source::{ChannelSource, SourceError};
use crate::error::RelayError;
use crate::relay::ChannelRelay;

/// Active set of watched channel ids.
#[derive(Clone, Default)]
pub struct WatchSet {
    ids: Arc<RwLock<BTreeSet<i64>>>,
}

impl WatchSet {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: Arc::new(RwLock::new(ids.into_iter().collect())),
        }
    }

    pub async fn snapshot(&self) -> Vec<i64> {
        self.ids.read().await.iter().copied().collect()
    }

    pub async fn contains(&self, channel_id: i64) -> bool {
        self.ids.read().await.contains(&channel_id)
    }

    pub async fn remove(&self, channel_id: i64) -> bool {
        self.ids.write().await.remove(&channel_id)
    }

    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ids.read().await.is_empty()
    }
}

/// Resolves handles to channel ids. Failures are logged and skipped.
pub async fn resolve_watch_set(source: &dyn ChannelSource, handles: &[String]) -> WatchSet {
    let mut ids = Vec::new();
    for handle in handles {
        match source.resolve(handle).await {
            Ok(id) => {
                info!(handle = %handle, channel_id = id, "Watching channel");
                ids.push(id);
            }
            Err(e) => warn!(handle = %handle, error = %e, "Failed to resolve watched channel"),
        }
    }
    if ids.is_empty() && !handles.is_empty() {
        warn!("No watched channels resolved, watcher disabled");
    }
    WatchSet::new(ids)
}

/// Result of one scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
    pub removed: Vec<i64>,
}

enum ChannelOutcome {
    Delivered,
    Skipped,
}

pub struct Poller {
    source: Arc<dyn ChannelSource>,
    relay: Arc<ChannelRelay>,
    watch: WatchSet,
    ledger: DeliveryLedger,
    interval: Duration,
    tracker: InFlightTracker,
}

impl Poller {
    pub fn new(
        source: Arc<dyn ChannelSource>,
        relay: Arc<ChannelRelay>,
        watch: WatchSet,
        ledger: DeliveryLedger,
        interval: Duration,
        tracker: InFlightTracker,
    ) -> Self {
        Self {
            source,
            relay,
            watch,
            ledger,
            interval,
            tracker,
        }
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch
    }

    /// Scans immediately, then every interval, until shutdown or the set becomes empty.
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        let channels = self.watch.len().await;
        info!(channels, interval_secs = self.interval.as_secs(), "Poller started");
        loop {
            if shutdown.is_triggered() {
                break;
            }
            if self.watch.is_empty().await {
                info!("No watched channels left");
                break;
            }
            let report = self.poll_once().await;
            debug!(?report, "Poll finished");

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                () = shutdown.wait() => break,
            }
        }
        info!("Poller stopped");
    }

    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> PollReport {
        let _guard = self.tracker.start();
        let mut report = PollReport::default();

        for channel_id in self.watch.snapshot().await {
            match self.poll_channel(channel_id).await {
                Ok(ChannelOutcome::Delivered) => report.delivered += 1,
                Ok(ChannelOutcome::Skipped) => report.skipped += 1,
                Err(RelayError::TransientPeerError { channel_id, reason }) => {
                    warn!(channel_id, reason = %reason, "Watched channel no longer accessible, removed");
                    self.watch.remove(channel_id).await;
                    report.removed.push(channel_id);
                }
                Err(e) => {
                    warn!(channel_id, error = %e, "Watched channel poll failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn poll_channel(&self, channel_id: i64) -> Result<ChannelOutcome, RelayError> {
        let to_relay = |e: SourceError| match e {
            SourceError::PeerUnavailable(reason) => {
                RelayError::TransientPeerError { channel_id, reason }
            }
            SourceError::Transport(reason) => RelayError::SourceUnavailable(reason),
        };

        self.source.check_access(channel_id).await.map_err(to_relay)?;
        let Some(post) = self.source.latest_post(channel_id).await.map_err(to_relay)? else {
            return Ok(ChannelOutcome::Skipped);
        };
        if !self.ledger.claim(channel_id, post.message_id).await {
            return Ok(ChannelOutcome::Skipped);
        }
        info!(channel_id, message_id = post.message_id, "New post in watched channel");

        match self.relay.relay_post(&post, None).await {
            Ok(delivered) => {
                self.ledger.confirm(channel_id, post.message_id).await;
                Ok(if delivered.is_some() {
                    ChannelOutcome::Delivered
                } else {
                    ChannelOutcome::Skipped
                })
            }
            Err(e) => {
                self.ledger
                    .settle_failure(channel_id, post.message_id, e.is_retryable())
                    .await;
                Err(e)
            }
        }
    }
}
