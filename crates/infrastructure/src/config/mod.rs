//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `integrations`: Baidu Maps credentials and request hints
//! - `storage`: result directory, retention, static assets
//! - `commute`: display-only commute settings
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then `COMMUTE_*` environment variables (`__` separates nested keys).

mod commute;
mod integrations;
mod server;
mod storage;

use integration_baidu::BaiduConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use commute::CommuteConfig;
pub use integrations::BaiduAppConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "COMMUTE";

/// Plain comma-separated key list honoured when no keys are configured
pub const LEGACY_KEYS_VAR: &str = "BAIDU_API_KEYS";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Baidu Maps configuration
    #[serde(default)]
    pub baidu: BaiduAppConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Commute display settings
    #[serde(default)]
    pub commute: CommuteConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file stem or path and the environment
    ///
    /// The file is optional. Environment variables take precedence over it,
    /// e.g. `COMMUTE_SERVER__PORT=8080` or `COMMUTE_BAIDU__API_KEYS=a,b`.
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("baidu.api_keys")
                    .with_list_parse_key("server.allowed_origins")
                    .with_list_parse_key("storage.allowed_extensions")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_legacy_keys(std::env::var(LEGACY_KEYS_VAR).ok().as_deref());
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Fill `baidu.api_keys` from a legacy comma-separated list when empty
    pub fn apply_legacy_keys(&mut self, raw: Option<&str>) {
        let configured = self
            .baidu
            .api_keys
            .iter()
            .any(|k| !k.trim().is_empty());
        if configured {
            return;
        }
        if let Some(raw) = raw {
            let keys = BaiduConfig::parse_key_list(raw);
            if !keys.is_empty() {
                info!(count = keys.len(), "Using API keys from {LEGACY_KEYS_VAR}");
                self.baidu.api_keys = keys;
            }
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.baidu.validate()?;
        self.storage.validate()?;
        self.commute.validate()?;
        Ok(())
    }
}
