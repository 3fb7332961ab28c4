//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Every API credential reached its daily cap
    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Geocoding or routing for one address pair failed
    #[error("Commute calculation failed: {0}")]
    CommuteInfo(String),

    /// Reading or writing a stored file failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the caller sent something unusable
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(DomainError::ValidationError(_)))
    }

    /// Whether the error means the resource is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Domain(DomainError::NotFound { .. })
        )
    }
}
