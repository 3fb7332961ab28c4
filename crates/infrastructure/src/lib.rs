//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: Baidu Maps commute
//! lookups and Excel workbook storage. Also owns configuration loading and
//! the tracing subscriber setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, BaiduAppConfig, CommuteConfig, ServerConfig, StorageConfig};
pub use telemetry::{LogFormat, init_tracing};
