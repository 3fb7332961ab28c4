//! Baidu Maps error types

use thiserror::Error;

/// Provider status code for an exceeded daily quota
pub(crate) const QUOTA_EXCEEDED_STATUS: i64 = 302;

/// Errors that can occur while talking to Baidu Maps
#[derive(Debug, Error)]
pub enum BaiduError {
    /// Connection to the map service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-200 HTTP status
    #[error("Request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The provider answered with a non-zero status
    #[error("Provider error {status}: {message}")]
    Provider {
        /// Provider status code
        status: i64,
        /// Provider message
        message: String,
    },

    /// The provider rejected the key for quota; the pool moved on to the next key
    #[error("Provider quota exceeded, switched to next API key")]
    QuotaExceeded,

    /// Every configured key reached its local daily cap
    #[error("All {keys} API keys reached their daily usage cap")]
    QuotaExhausted {
        /// Number of configured keys
        keys: usize,
    },

    /// Caller passed an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transit search returned no candidate routes
    #[error("No routes found")]
    NoRoutesFound,

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Geocoding a specific address failed
    #[error("Geocoding failed for '{address}': {source}")]
    Geocode {
        /// The address that was being resolved
        address: String,
        /// Underlying cause
        #[source]
        source: Box<BaiduError>,
    },

    /// Route calculation failed
    #[error("Route calculation ({mode}) failed: {source}")]
    Route {
        /// Requested routing mode
        mode: &'static str,
        /// Underlying cause
        #[source]
        source: Box<BaiduError>,
    },

    /// Commute lookup failed at either stage
    #[error("Commute info failed: {source}")]
    CommuteInfo {
        /// Underlying cause
        #[source]
        source: Box<BaiduError>,
    },
}

impl BaiduError {
    /// Returns true if this error (or its cause) is about API-key quota
    #[must_use]
    pub fn is_quota_related(&self) -> bool {
        match self {
            Self::QuotaExceeded | Self::QuotaExhausted { .. } => true,
            Self::Geocode { source, .. } | Self::Route { source, .. } | Self::CommuteInfo { source } => {
                source.is_quota_related()
            },
            _ => false,
        }
    }

    /// Innermost error in a wrapped chain
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Geocode { source, .. } | Self::Route { source, .. } | Self::CommuteInfo { source } => {
                source.root_cause()
            },
            other => other,
        }
    }
}
