//! Spreadsheet storage port
//!
//! Reads uploaded workbooks into an [`AddressTable`], writes annotated
//! result workbooks into the result directory and sweeps expired files.

use std::time::Duration;

use async_trait::async_trait;
use domain::{AddressTable, CommuteResult};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Outcome of one sweep over the result directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Files inspected
    pub scanned: usize,
    /// Files deleted because they were older than the threshold
    pub removed: usize,
    /// Files that could not be inspected or deleted
    pub failed: usize,
}

/// Port for spreadsheet parsing and result-file storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpreadsheetPort: Send + Sync {
    /// Reject file names whose extension is not accepted
    fn validate_extension(&self, file_name: &str) -> Result<(), ApplicationError>;

    /// Parse an uploaded workbook
    ///
    /// Fails with a validation error when the address column is missing.
    async fn read_table(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AddressTable, ApplicationError>;

    /// Write the original rows plus computed columns, returning the stored
    /// file name
    ///
    /// `results` corresponds positionally to `table.rows()`.
    async fn write_result_table(
        &self,
        table: &AddressTable,
        results: &[CommuteResult],
    ) -> Result<String, ApplicationError>;

    /// Load a stored result file by name
    async fn open_result(&self, file_name: &str) -> Result<Vec<u8>, ApplicationError>;

    /// Delete stored files older than `max_age`
    async fn sweep_old_files(&self, max_age: Duration) -> Result<SweepReport, ApplicationError>;
}
