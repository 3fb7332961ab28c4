//! Stored file retention sweep
//!
//! Periodically removes uploaded and generated workbooks older than the
//! configured maximum age.

use std::{sync::Arc, time::Duration};

use application::CommuteBatchService;
use tracing::{debug, error, info};

/// Spawn a background task that sweeps expired files.
///
/// The first sweep runs immediately, later ones every `interval`.
///
/// Returns a `JoinHandle` that can be used to abort the task when shutting down.
///
/// # Example
///
/// ```ignore
/// let cleanup_handle = spawn_file_cleanup_task(
///     batch_service,
///     Duration::from_secs(24 * 3600),
///     Duration::from_secs(3600),
/// );
///
/// // On shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_file_cleanup_task(
    batch_service: Arc<CommuteBatchService>,
    max_age: Duration,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        max_age_secs = max_age.as_secs(),
        interval_secs = interval.as_secs(),
        "Starting file cleanup task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            // First tick completes immediately
            ticker.tick().await;

            match batch_service.sweep_old_results(max_age).await {
                Ok(report) => {
                    debug!(
                        scanned = report.scanned,
                        removed = report.removed,
                        failed = report.failed,
                        "File sweep completed"
                    );
                },
                Err(e) => {
                    error!(error = %e, "File sweep failed");
                },
            }
        }
    })
}
