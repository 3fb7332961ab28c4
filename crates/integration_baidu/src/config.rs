//! Baidu Maps client configuration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key_pool::mask_key;

/// Configuration for the Baidu Maps client
#[derive(Clone, Serialize, Deserialize)]
pub struct BaiduConfig {
    /// Base URL for the Baidu Maps web API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API keys (`ak`), used round-robin
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Requests allowed per key per process lifetime
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// City that scopes geocoding lookups
    #[serde(default = "default_city")]
    pub city: String,

    /// Region that scopes route planning
    #[serde(default = "default_region")]
    pub region: String,

    /// Coordinate delta (degrees) above which transit is used instead of riding
    #[serde(default = "default_transit_threshold_degrees")]
    pub transit_threshold_degrees: f64,
}

fn default_base_url() -> String {
    "https://api.map.baidu.com".to_string()
}

const fn default_daily_cap() -> u32 {
    5000
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_city() -> String {
    "上海市".to_string()
}

fn default_region() -> String {
    "上海".to_string()
}

const fn default_transit_threshold_degrees() -> f64 {
    0.045
}

impl Default for BaiduConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_keys: Vec::new(),
            daily_cap: default_daily_cap(),
            timeout_secs: default_timeout_secs(),
            city: default_city(),
            region: default_region(),
            transit_threshold_degrees: default_transit_threshold_degrees(),
        }
    }
}

impl fmt::Debug for BaiduConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked: Vec<String> = self.api_keys.iter().map(|k| mask_key(k)).collect();
        f.debug_struct("BaiduConfig")
            .field("base_url", &self.base_url)
            .field("api_keys", &masked)
            .field("daily_cap", &self.daily_cap)
            .field("timeout_secs", &self.timeout_secs)
            .field("city", &self.city)
            .field("region", &self.region)
            .field("transit_threshold_degrees", &self.transit_threshold_degrees)
            .finish()
    }
}

impl BaiduConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: &str, keys: &[&str]) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_keys: keys.iter().map(|k| (*k).to_string()).collect(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Parse a comma-separated key list, skipping blanks
    #[must_use]
    pub fn parse_key_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Configured keys with surrounding whitespace removed, blanks skipped
    #[must_use]
    pub fn usable_keys(&self) -> Vec<String> {
        self.api_keys
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.usable_keys().is_empty() {
            return Err("at least one API key must be configured".to_string());
        }

        if self.daily_cap == 0 {
            return Err("daily_cap must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if !(self.transit_threshold_degrees.is_finite() && self.transit_threshold_degrees > 0.0) {
            return Err("transit_threshold_degrees must be a positive number".to_string());
        }

        Ok(())
    }
}
