//! Baidu Maps data models
//!
//! Typed results plus the raw response shapes of the geocoding v3 and
//! direction v2 APIs.

use std::fmt;
use std::str::FromStr;

use domain::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::BaiduError;

/// Routing mode supported by the direction API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Public transportation
    Transit,
    /// Cycling
    Riding,
}

impl RouteMode {
    /// Pick transit when either coordinate delta exceeds `threshold_degrees`,
    /// riding otherwise
    #[must_use]
    pub fn for_trip(start: &Coordinate, end: &Coordinate, threshold_degrees: f64) -> Self {
        if start.delta_exceeds(end, threshold_degrees) {
            Self::Transit
        } else {
            Self::Riding
        }
    }

    /// Mode name as used in API paths
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transit => "transit",
            Self::Riding => "riding",
        }
    }

    pub(crate) fn path(self) -> String {
        format!("/direction/v2/{}", self.as_str())
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMode {
    type Err = BaiduError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transit" => Ok(Self::Transit),
            "riding" => Ok(Self::Riding),
            other => Err(BaiduError::InvalidArgument(format!(
                "unsupported route mode: {other}"
            ))),
        }
    }
}

impl From<RouteMode> for domain::TransportMode {
    fn from(mode: RouteMode) -> Self {
        match mode {
            RouteMode::Transit => Self::Transit,
            RouteMode::Riding => Self::Riding,
        }
    }
}

/// A planned route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Travel time in seconds
    pub duration_secs: u64,
    /// Route length in kilometers
    pub distance_km: f64,
    /// Mode the route was planned for
    pub mode: RouteMode,
}

/// Geocoded endpoints plus the chosen route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommuteInfo {
    /// Start of the commute
    pub start: Coordinate,
    /// End of the commute
    pub end: Coordinate,
    /// Route length in kilometers
    pub distance_km: f64,
    /// Travel time in seconds
    pub duration_secs: u64,
    /// Mode the route was planned for
    pub mode: RouteMode,
}

impl From<CommuteInfo> for domain::CommuteResult {
    fn from(info: CommuteInfo) -> Self {
        Self {
            start: info.start,
            end: info.end,
            distance_km: info.distance_km,
            duration_secs: info.duration_secs,
            mode: info.mode.into(),
        }
    }
}

/// Status envelope shared by every response
#[derive(Debug, Deserialize)]
pub(crate) struct RawStatus {
    pub status: i64,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeocodeResponse {
    pub result: RawGeocodeResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeocodeResult {
    pub location: RawLocation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RawRoute {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

impl RawRoute {
    pub(crate) fn into_route_info(self, mode: RouteMode) -> RouteInfo {
        RouteInfo {
            duration_secs: self.duration.max(0.0).round() as u64,
            distance_km: self.distance / 1000.0,
            mode,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransitResponse {
    pub result: RawTransitResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransitResult {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

impl RawTransitResult {
    /// Fastest route; the first one wins a tie
    pub(crate) fn fastest(&self) -> Option<RawRoute> {
        self.routes
            .iter()
            .copied()
            .min_by(|a, b| a.duration.total_cmp(&b.duration))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRidingResponse {
    pub result: RawRidingResult,
}

/// Riding answers carry either top-level totals or a `routes` array
#[derive(Debug, Deserialize)]
pub(crate) struct RawRidingResult {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

impl RawRidingResult {
    pub(crate) fn route(&self) -> Option<RawRoute> {
        match (self.distance, self.duration) {
            (Some(distance), Some(duration)) => Some(RawRoute { distance, duration }),
            _ => self.routes.first().copied(),
        }
    }
}
