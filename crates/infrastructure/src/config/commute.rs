//! Commute settings.

use serde::{Deserialize, Serialize};

/// Commute display settings
///
/// The riding/transit decision itself is taken on the coordinate delta
/// (`baidu.transit_threshold_degrees`); the kilometer value is shown to
/// users as an approximation of that threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteConfig {
    /// Approximate cycling limit in kilometers (default: 5)
    #[serde(default = "default_cycling_threshold")]
    pub cycling_distance_threshold_km: f64,
}

const fn default_cycling_threshold() -> f64 {
    5.0
}

impl Default for CommuteConfig {
    fn default() -> Self {
        Self {
            cycling_distance_threshold_km: default_cycling_threshold(),
        }
    }
}

impl CommuteConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cycling_distance_threshold_km.is_finite()
            && self.cycling_distance_threshold_km > 0.0)
        {
            return Err("commute.cycling_distance_threshold_km must be positive".to_string());
        }
        Ok(())
    }
}
