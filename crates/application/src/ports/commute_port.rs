//! Commute calculation port
//!
//! Resolves two free-text addresses into a [`CommuteResult`]. The Baidu
//! adapter in the infrastructure layer implements this port.

use async_trait::async_trait;
use domain::CommuteResult;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for geocoding and routing between two addresses
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommutePort: Send + Sync {
    /// Geocode both addresses and plan the commute from `start` to `end`
    async fn commute_info(&self, start: &str, end: &str)
    -> Result<CommuteResult, ApplicationError>;

    /// Number of credentials still below their daily cap
    fn credentials_available(&self) -> usize;

    /// Number of configured credentials
    fn credentials_configured(&self) -> usize;
}
