//! Commute HTTP presentation layer
//!
//! Upload, download, health and progress endpoints over the batch service.

pub mod error;
pub mod handlers;
pub mod progress;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use progress::ProgressBroadcaster;
pub use routes::create_router;
pub use shutdown::{ShutdownOutcome, ShutdownTrigger, run_with_deadline, shutdown_signal};
pub use state::AppState;
pub use tasks::spawn_file_cleanup_task;
