//! Delivery ledger shared by the push handler and the poller so each post is delivered once.
//!
//! A post is first claimed (pending), then either confirmed after a successful delivery or
//! released after a failure so the next poller scan retries it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

#[derive(Default)]
struct LedgerState {
    delivered: HashMap<i64, i32>,
    pending: HashSet<(i64, i32)>,
}

#[derive(Clone, Default)]
pub struct DeliveryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl DeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically reserves `message_id` for delivery. False when it (or a newer post) was
    /// already delivered, or when another producer holds it.
    pub async fn claim(&self, channel_id: i64, message_id: i32) -> bool {
        let mut state = self.state.lock().await;
        if matches!(state.delivered.get(&channel_id), Some(&known) if known >= message_id) {
            return false;
        }
        state.pending.insert((channel_id, message_id))
    }

    /// Marks a claimed post as delivered.
    pub async fn confirm(&self, channel_id: i64, message_id: i32) {
        let mut state = self.state.lock().await;
        state.pending.remove(&(channel_id, message_id));
        let entry = state.delivered.entry(channel_id).or_insert(message_id);
        *entry = (*entry).max(message_id);
    }

    /// Gives a claimed post back after a failed delivery.
    pub async fn release(&self, channel_id: i64, message_id: i32) {
        self.state
            .lock()
            .await
            .pending
            .remove(&(channel_id, message_id));
    }

    /// Settles a claim whose delivery failed: released for a retry, or confirmed when retrying
    /// cannot help.
    pub async fn settle_failure(&self, channel_id: i64, message_id: i32, retryable: bool) {
        if retryable {
            self.release(channel_id, message_id).await;
        } else {
            self.confirm(channel_id, message_id).await;
        }
    }

    /// Records a delivery that bypassed [`claim`](Self::claim) (edited posts).
    pub async fn record(&self, channel_id: i64, message_id: i32) {
        self.confirm(channel_id, message_id).await;
    }

    pub async fn last_delivered(&self, channel_id: i64) -> Option<i32> {
        self.state.lock().await.delivered.get(&channel_id).copied()
    }
}
