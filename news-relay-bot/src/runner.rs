//! Main entry: shutdown wiring, supervised bot runs, startup diagnostic, poller, dispatcher.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use telegram_bot::{
    run_dispatcher, shutdown_channel, InFlightTracker, ShutdownSignal, ShutdownTrigger,
};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::components::{build_components, RelayCore, SharedState};
use crate::config::RelayConfig;
use crate::supervisor::supervise;
use crate::watcher::{resolve_watch_set, BotApiChannelSource, ChannelSource, Poller};

/// Triggers shutdown on Ctrl+C or SIGTERM.
fn spawn_signal_listener(trigger: ShutdownTrigger) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => info!("Received Ctrl+C, shutting down"),
            () = terminate => info!("Received terminate signal, shutting down"),
        }
        trigger.trigger();
    });
}

/// Logs whether the configured destination accepts messages.
pub async fn log_destination_probe(core: &RelayCore) {
    match core.relay.probe_destination().await {
        None => info!("No destination configured (DEST_CHAT_ID / TARGET_CHAT_ID); send-permission check skipped"),
        Some(true) => info!(chat_id = ?core.destination.chat_id(), "Send permission: OK"),
        Some(false) => warn!(chat_id = ?core.destination.chat_id(), "Send permission: NO"),
    }
}

/// Stops a spawned poller: signals it, then lets a running scan finish within `grace`.
/// Returns false when the scan was still running at the deadline and had to be aborted.
pub async fn stop_poller(task: JoinHandle<()>, stop: ShutdownTrigger, grace: Duration) -> bool {
    stop.trigger();
    let abort = task.abort_handle();
    match tokio::time::timeout(grace, task).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(error = %e, "Poller task failed");
            true
        }
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "Poller scan still running after grace period, aborted");
            abort.abort();
            false
        }
    }
}

/// One bot lifetime: build components, probe, start the poller, dispatch until stop.
#[instrument(skip_all)]
async fn run_once(
    config: &RelayConfig,
    state: &SharedState,
    tracker: &InFlightTracker,
    shutdown: ShutdownSignal,
) -> Result<()> {
    let components = build_components(config, state.clone())?;
    let core = components.core;
    log_destination_probe(&core).await;

    let poller_task = if config.watch_channels.is_empty() {
        info!("WATCH_CHANNELS is empty, watcher disabled");
        None
    } else {
        let source: Arc<dyn ChannelSource> = Arc::new(BotApiChannelSource::new(
            components.teloxide_bot.clone(),
            state.snapshots.clone(),
        ));
        let watch = resolve_watch_set(source.as_ref(), &config.watch_channels).await;
        if watch.is_empty().await {
            None
        } else {
            let poller = Poller::new(
                source,
                core.relay.clone(),
                watch,
                state.ledger.clone(),
                config.poll_interval,
                tracker.clone(),
            );
            // Own stop signal: the poller also stops when this run ends without a shutdown.
            let (stop, stop_signal) = shutdown_channel();
            Some((tokio::spawn(poller.run(stop_signal)), stop))
        }
    };

    info!("Bot started");
    let result = run_dispatcher(
        components.teloxide_bot,
        core.handler_chain(),
        core.bot_username.clone(),
        tracker.clone(),
        shutdown,
    )
    .await;

    if let Some((task, stop)) = poller_task {
        stop_poller(task, stop, config.shutdown_grace).await;
    }
    result
}

/// Runs the bot under the supervisor until Ctrl+C / SIGTERM, then waits up to the grace
/// period for in-flight rewrites.
pub async fn run_relay_bot(config: RelayConfig) -> Result<()> {
    let (trigger, shutdown) = shutdown_channel();
    spawn_signal_listener(trigger);

    let state = SharedState::default();
    let tracker = InFlightTracker::new();

    info!(
        destination = ?config.destination.chat_id(),
        watch_channels = config.watch_channels.len(),
        "Initializing news relay bot"
    );

    let config = &config;
    let state_ref = &state;
    let tracker_ref = &tracker;
    let signal = shutdown.clone();
    supervise("news-relay-bot", config.restart_delay, shutdown, move || {
        run_once(config, state_ref, tracker_ref, signal.clone())
    })
    .await;

    info!(in_flight = tracker.in_flight(), "Waiting for in-flight work");
    tracker.wait_idle(config.shutdown_grace).await;
    info!("News relay bot stopped");
    Ok(())
}
