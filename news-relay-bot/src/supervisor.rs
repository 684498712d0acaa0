//! Iterative restart loop: a failed or exited bot run is logged and restarted after a fixed
//! delay until shutdown is requested.

use std::future::Future;
use std::time::Duration;

use telegram_bot::ShutdownSignal;
use tracing::{error, info, warn};

/// Runs `run` until it returns after shutdown was triggered. Returns the number of restarts.
pub async fn supervise<F, Fut>(
    name: &'static str,
    restart_delay: Duration,
    mut shutdown: ShutdownSignal,
    mut run: F,
) -> u32
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut restarts: u32 = 0;
    loop {
        info!(component = name, restarts, "Starting");
        match run().await {
            Ok(()) if shutdown.is_triggered() => {
                info!(component = name, "Stopped on shutdown");
                return restarts;
            }
            Ok(()) => warn!(component = name, "Exited unexpectedly"),
            Err(e) => error!(component = name, error = %format!("{:#}", e), "Fatal error"),
        }
        if shutdown.is_triggered() {
            return restarts;
        }

        info!(component = name, delay_secs = restart_delay.as_secs(), "Restarting after delay");
        tokio::select! {
            () = tokio::time::sleep(restart_delay) => {}
            () = shutdown.wait() => return restarts,
        }
        restarts = restarts.saturating_add(1);
    }
}
