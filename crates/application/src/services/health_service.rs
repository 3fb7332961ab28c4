//! Health reporting service
//!
//! Reports liveness together with how many map-service credentials still
//! have daily quota left.

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::CommutePort;

/// Health snapshot served by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"healthy"` while the process answers
    pub status: String,
    /// Credentials still below their daily cap
    pub api_keys_available: usize,
    /// Credentials configured in total
    pub api_keys_configured: usize,
    /// Local time of the check, ISO 8601 without offset
    pub timestamp: String,
}

impl HealthReport {
    /// Whether any credential can still be used
    #[must_use]
    pub const fn has_quota(&self) -> bool {
        self.api_keys_available > 0
    }
}

/// Service producing [`HealthReport`]s
pub struct HealthService {
    commute: Arc<dyn CommutePort>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("commute", &"<CommutePort>")
            .finish()
    }
}

impl HealthService {
    /// Create a new health service
    #[must_use]
    pub fn new(commute: Arc<dyn CommutePort>) -> Self {
        Self { commute }
    }

    /// Take a health snapshot
    pub fn check(&self) -> HealthReport {
        let available = self.commute.credentials_available();
        let configured = self.commute.credentials_configured();
        debug!(available, configured, "Health check");

        HealthReport {
            status: "healthy".to_string(),
            api_keys_available: available,
            api_keys_configured: configured,
            timestamp: Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        }
    }
}
