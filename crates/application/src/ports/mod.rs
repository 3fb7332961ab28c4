//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod commute_port;
mod progress_port;
mod spreadsheet_port;

pub use commute_port::CommutePort;
#[cfg(test)]
pub use commute_port::MockCommutePort;
pub use progress_port::{LoggingProgress, NoopProgress, ProgressSink, progress_percent};
#[cfg(test)]
pub use spreadsheet_port::MockSpreadsheetPort;
pub use spreadsheet_port::{SpreadsheetPort, SweepReport};
