//! Graceful shutdown: a broadcastable stop signal for producers and a tracker for in-flight work.
//!
//! Producers (dispatcher, poller) watch [`ShutdownSignal`]; every spawned event task holds an
//! [`InFlightGuard`] so the process can wait for running rewrites before exiting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tracing::{info, warn};

/// Sender half: flip once to stop every producer.
#[derive(Clone)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

/// Receiver half handed to producers.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// Creates a connected trigger/signal pair.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx: Arc::new(tx) }, ShutdownSignal { rx })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // send_replace never fails, even when every receiver is gone.
        self.tx.send_replace(true);
    }
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is triggered (or the trigger is dropped).
    pub async fn wait(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Counts in-flight event tasks.
#[derive(Clone, Default)]
pub struct InFlightTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Default)]
struct TrackerInner {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrements the tracker on drop.
pub struct InFlightGuard {
    inner: Arc<TrackerInner>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work until the guard is dropped.
    pub fn start(&self) -> InFlightGuard {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Waits until no work is in flight or `grace` elapses. Returns true when idle.
    pub async fn wait_idle(&self, grace: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.inner.idle.notified();
                if self.in_flight() == 0 {
                    return;
                }
                notified.await;
            }
        };
        match tokio::time::timeout(grace, wait).await {
            Ok(()) => {
                info!("All in-flight work finished");
                true
            }
            Err(_) => {
                warn!(in_flight = self.in_flight(), grace_secs = grace.as_secs(), "Grace period elapsed with work still running");
                false
            }
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
