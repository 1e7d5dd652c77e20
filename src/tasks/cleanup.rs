//! Purge Task
//!
//! Background task that periodically drops deprecated cache holders.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::context::AppContext;

/// Spawns a background task that periodically purges every cache pool.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between runs. Purge failures are logged and retried on the next tick.
///
/// # Arguments
/// * `context` - shared application context owning the pools
/// * `cleanup_interval_secs` - Interval in seconds between purge runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let context = Arc::new(AppContext::from_config(&config)?);
/// let cleanup_handle = spawn_cleanup_task(context.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(context: Arc<AppContext>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache purge task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            match context.purge(Instant::now()) {
                Ok(0) => debug!("Cache purge: no deprecated entries found"),
                Ok(removed) => info!("Cache purge: removed {} deprecated entries", removed),
                Err(err) => warn!(error = %err, "Cache purge failed"),
            }
        }
    })
}
