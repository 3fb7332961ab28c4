//! Progress reporting port
//!
//! Batches report completion as an integer percentage. Delivery is
//! fire-and-forget: a sink must never block or fail the batch.

use tracing::info;

/// Receiver of batch progress updates
pub trait ProgressSink: Send + Sync {
    /// Report completion in percent (0-100)
    fn report(&self, percent: u8);
}

/// Discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _percent: u8) {}
}

/// Writes every update to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingProgress;

impl ProgressSink for LoggingProgress {
    fn report(&self, percent: u8) {
        info!(progress = percent, "Batch progress");
    }
}

/// Integer percentage of `completed` out of `total`, truncated
///
/// An empty batch counts as complete.
#[must_use]
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = completed.min(total) * 100 / total;
    percent as u8
}
