//! Commute results and the derived result-row columns

use serde::{Deserialize, Serialize};

use crate::value_objects::{Coordinate, TransportMode};

/// Headers of the computed columns, in the order they are appended
pub const RESULT_COLUMNS: [&str; 5] = [
    "经度",
    "纬度",
    "直线距离(公里)",
    "通勤时间(分钟)",
    "交通方式",
];

/// Combined geocoding and routing outcome for one row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommuteResult {
    /// Where the commute starts (the row's address)
    pub start: Coordinate,
    /// Where the commute ends (the target address)
    pub end: Coordinate,
    /// Route distance in kilometers
    pub distance_km: f64,
    /// Route duration in seconds
    pub duration_secs: u64,
    /// Chosen transport mode
    pub mode: TransportMode,
}

impl CommuteResult {
    /// The error-tagged placeholder for a row that could not be resolved
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            start: Coordinate::zero(),
            end: Coordinate::zero(),
            distance_km: 0.0,
            duration_secs: 0,
            mode: TransportMode::Error,
        }
    }

    /// Whether this is the error-tagged placeholder
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.mode == TransportMode::Error
    }
}

/// Round to two decimal places, halves away from zero
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The five computed columns for one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Longitude of the row's address
    pub longitude: f64,
    /// Latitude of the row's address
    pub latitude: f64,
    /// Distance in kilometers, rounded to 2 decimals
    pub distance_km: f64,
    /// Duration in whole minutes
    pub commute_minutes: u64,
    /// Localized transport mode
    pub transport_label: String,
}

impl From<&CommuteResult> for ResultRow {
    fn from(result: &CommuteResult) -> Self {
        Self {
            longitude: result.start.longitude(),
            latitude: result.start.latitude(),
            distance_km: round_to_cents(result.distance_km),
            commute_minutes: (result.duration_secs as f64 / 60.0).round() as u64,
            transport_label: result.mode.label().to_string(),
        }
    }
}
