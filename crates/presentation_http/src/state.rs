//! Application state shared across handlers

use std::sync::Arc;

use application::{CommuteBatchService, HealthService};
use infrastructure::AppConfig;

use crate::progress::ProgressBroadcaster;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Batch use case
    pub batch_service: Arc<CommuteBatchService>,
    /// Health reporting
    pub health_service: Arc<HealthService>,
    /// Progress fan-out for connected clients
    pub progress: ProgressBroadcaster,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("progress_subscribers", &self.progress.subscriber_count())
            .finish_non_exhaustive()
    }
}
