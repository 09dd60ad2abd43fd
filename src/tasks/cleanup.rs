//! Expiry Cleanup Task
//!
//! Background task that periodically purges expired entries from the
//! in-memory store. Redis expires keys on its own and needs no such task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a task that purges expired entries every `cleanup_interval_secs`
/// until `shutdown` fires.
pub fn spawn_cleanup_task(
    store: Arc<MemoryStore>,
    cleanup_interval_secs: u64,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!("Expiry cleanup: removed {} expired entries", removed);
            } else {
                debug!("Expiry cleanup: no expired entries found");
            }
        }

        debug!("Expiry cleanup task stopped");
    })
}
