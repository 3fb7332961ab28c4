//! Baidu Maps integration for the commute calculator
//!
//! Provides address geocoding via the Baidu geocoding v3 API and route
//! planning via the direction v2 transit and riding APIs.
//!
//! # Architecture
//!
//! [`MapClient`] defines the interface, implemented by [`BaiduMapClient`].
//! Every request draws a credential from a shared [`KeyPool`], which counts
//! usage per key against a daily cap and rotates round-robin when the
//! provider reports an exceeded quota.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_baidu::{BaiduConfig, BaiduMapClient, MapClient};
//!
//! let config = BaiduConfig {
//!     api_keys: vec!["key-a".into(), "key-b".into()],
//!     ..BaiduConfig::default()
//! };
//! let client = BaiduMapClient::new(&config)?;
//!
//! let info = client.get_commute_info("人民广场", "陆家嘴").await?;
//! println!("{} km by {}", info.distance_km, info.mode);
//! ```

mod client;
mod config;
mod error;
mod key_pool;
mod models;

pub use client::{BaiduMapClient, MapClient};
pub use config::BaiduConfig;
pub use error::BaiduError;
pub use key_pool::{CredentialUsage, KeyPool, mask_key};
pub use models::{CommuteInfo, RouteInfo, RouteMode};
