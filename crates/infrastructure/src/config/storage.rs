//! File storage settings: upload/result directory, accepted extensions,
//! retention and the static sample workbook.

use std::path::PathBuf;
use std::time::Duration;

use domain::DEFAULT_ADDRESS_COLUMN;
use serde::{Deserialize, Serialize};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for result workbooks (created on startup)
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Accepted upload extensions, without the dot
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Age after which stored files are deleted (default: 24h)
    #[serde(default = "default_max_age_hours")]
    pub max_file_age_hours: u64,

    /// Interval between retention sweeps (default: 1h)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Directory holding static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Sample workbook name inside `static_dir`
    #[serde(default = "default_sample_file")]
    pub sample_file: String,

    /// Header of the address column
    #[serde(default = "default_address_column")]
    pub address_column: String,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_extensions() -> Vec<String> {
    vec!["xlsx".to_string(), "xls".to_string()]
}

const fn default_max_age_hours() -> u64 {
    24
}

const fn default_sweep_interval() -> u64 {
    3600
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend/static")
}

fn default_sample_file() -> String {
    "sample.xlsx".to_string()
}

fn default_address_column() -> String {
    DEFAULT_ADDRESS_COLUMN.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            allowed_extensions: default_extensions(),
            max_file_age_hours: default_max_age_hours(),
            sweep_interval_secs: default_sweep_interval(),
            static_dir: default_static_dir(),
            sample_file: default_sample_file(),
            address_column: default_address_column(),
        }
    }
}

impl StorageConfig {
    /// Retention threshold
    #[must_use]
    pub const fn max_file_age(&self) -> Duration {
        Duration::from_secs(self.max_file_age_hours * 3600)
    }

    /// Interval between sweeps
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Full path of the sample workbook
    #[must_use]
    pub fn sample_path(&self) -> PathBuf {
        self.static_dir.join(&self.sample_file)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.upload_dir.as_os_str().is_empty() {
            return Err("storage.upload_dir must not be empty".to_string());
        }
        if self.allowed_extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("storage.allowed_extensions must list at least one extension".to_string());
        }
        if self.max_file_age_hours == 0 {
            return Err("storage.max_file_age_hours must be greater than 0".to_string());
        }
        if self.sweep_interval_secs == 0 {
            return Err("storage.sweep_interval_secs must be greater than 0".to_string());
        }
        if self.address_column.trim().is_empty() {
            return Err("storage.address_column must not be empty".to_string());
        }
        Ok(())
    }
}
