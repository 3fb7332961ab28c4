//! Application services - Use case implementations

mod commute_batch_service;
mod health_service;

pub use commute_batch_service::{BatchSummary, CommuteBatchService};
pub use health_service::{HealthReport, HealthService};
