//! Map service integration settings.

use integration_baidu::BaiduConfig;
use serde::{Deserialize, Serialize};

/// Baidu Maps configuration
///
/// `api_keys` accepts a list in TOML or a comma-separated string in the
/// environment (`COMMUTE_BAIDU__API_KEYS=a,b,c`).
#[derive(Clone, Serialize, Deserialize)]
pub struct BaiduAppConfig {
    /// Base URL of the Baidu Maps web API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API credentials, used round-robin
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Requests allowed per key per process lifetime (default: 5000)
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// City hint for geocoding
    #[serde(default = "default_city")]
    pub city: String,

    /// Region hint for route planning
    #[serde(default = "default_region")]
    pub region: String,

    /// Coordinate delta in degrees above which transit is planned
    #[serde(default = "default_threshold")]
    pub transit_threshold_degrees: f64,
}

impl std::fmt::Debug for BaiduAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduAppConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_keys",
                &format!("[{} key(s) configured]", self.api_keys.len()),
            )
            .field("daily_cap", &self.daily_cap)
            .field("timeout_secs", &self.timeout_secs)
            .field("city", &self.city)
            .field("region", &self.region)
            .field("transit_threshold_degrees", &self.transit_threshold_degrees)
            .finish()
    }
}

fn default_base_url() -> String {
    BaiduConfig::default().base_url
}

fn default_daily_cap() -> u32 {
    BaiduConfig::default().daily_cap
}

fn default_timeout() -> u64 {
    BaiduConfig::default().timeout_secs
}

fn default_city() -> String {
    BaiduConfig::default().city
}

fn default_region() -> String {
    BaiduConfig::default().region
}

fn default_threshold() -> f64 {
    BaiduConfig::default().transit_threshold_degrees
}

impl Default for BaiduAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_keys: Vec::new(),
            daily_cap: default_daily_cap(),
            timeout_secs: default_timeout(),
            city: default_city(),
            region: default_region(),
            transit_threshold_degrees: default_threshold(),
        }
    }
}

impl BaiduAppConfig {
    /// Convert to `integration_baidu::BaiduConfig`
    #[must_use]
    pub fn to_baidu_config(&self) -> BaiduConfig {
        BaiduConfig {
            base_url: self.base_url.clone(),
            api_keys: self.api_keys.clone(),
            daily_cap: self.daily_cap,
            timeout_secs: self.timeout_secs,
            city: self.city.clone(),
            region: self.region.clone(),
            transit_threshold_degrees: self.transit_threshold_degrees,
        }
    }

    /// Check that the settings can build a working client
    pub fn validate(&self) -> Result<(), String> {
        self.to_baidu_config()
            .validate()
            .map_err(|e| format!("baidu: {e}"))
    }
}
