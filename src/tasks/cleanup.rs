//! Cache Cleanup Task
//!
//! Background task that periodically runs a cleanup pass over a cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::SweepReport;

/// Shortest interval the cleanup loop will sleep for.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_millis(1);

/// Something that can run one cleanup pass.
pub trait Sweep: Send + Sync + 'static {
    fn sweep(&self) -> SweepReport;
}

/// Spawns a background task that periodically sweeps `target`.
///
/// The task sleeps for `interval` between passes and exits as soon as
/// `shutdown` is cancelled, without running a final pass.
///
/// # Example
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let handle = spawn_cleanup_task(shared.clone(), Duration::from_secs(60), shutdown.clone());
/// // Later:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_cleanup_task<S: Sweep>(
    target: Arc<S>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let interval = interval.max(MIN_CLEANUP_INTERVAL);

    tokio::spawn(async move {
        debug!(interval_ms = interval.as_millis() as u64, "cache cleanup task started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let report = target.sweep();

            if report.removed() > 0 {
                info!(
                    expired = report.expired,
                    evicted = report.evicted,
                    "cache cleanup removed entries"
                );
            } else {
                debug!("cache cleanup: nothing to remove");
            }
        }

        debug!("cache cleanup task stopped");
    })
}
