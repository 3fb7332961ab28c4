//! Application layer - Use cases and orchestration
//!
//! Contains the batch use case, health reporting and the port definitions
//! the adapters implement. Orchestrates domain objects and infrastructure
//! adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
