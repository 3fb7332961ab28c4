//! Background tasks for the HTTP presentation layer

mod file_cleanup;

pub use file_cleanup::spawn_file_cleanup_task;
