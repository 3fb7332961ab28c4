//! Commute batch service
//!
//! Runs one uploaded address table against a single target address. Rows
//! are processed sequentially in input order; a failing row becomes an
//! error-tagged result and never aborts the batch.

use std::{fmt, sync::Arc, time::Duration};

use domain::{AddressTable, CommuteResult, DomainError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CommutePort, ProgressSink, SpreadsheetPort, SweepReport, progress_percent},
};

/// Summary returned once a batch has been written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Always `"success"`; failures surface as errors instead
    pub status: String,
    /// Name of the stored result workbook
    pub filename: String,
    /// Number of address rows processed
    pub total_processed: usize,
    /// Rows that ended up error-tagged
    pub failed_rows: usize,
}

/// Batch orchestration over the commute and spreadsheet ports
pub struct CommuteBatchService {
    commute: Arc<dyn CommutePort>,
    spreadsheets: Arc<dyn SpreadsheetPort>,
}

impl fmt::Debug for CommuteBatchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommuteBatchService").finish_non_exhaustive()
    }
}

impl CommuteBatchService {
    /// Create a new batch service
    pub fn new(commute: Arc<dyn CommutePort>, spreadsheets: Arc<dyn SpreadsheetPort>) -> Self {
        Self {
            commute,
            spreadsheets,
        }
    }

    /// Compute one result per row of `table`, in order
    ///
    /// Progress is reported after every row.
    #[instrument(skip(self, table, progress), fields(rows = table.len()))]
    pub async fn run_batch(
        &self,
        table: &AddressTable,
        target: &str,
        progress: &dyn ProgressSink,
    ) -> Vec<CommuteResult> {
        let total = table.len();
        info!(rows = total, "Starting commute batch");

        let mut results = Vec::with_capacity(total);
        for (index, row) in table.rows().iter().enumerate() {
            let result = match self.commute.commute_info(&row.address, target).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        row = index + 1,
                        address = %row.address,
                        error = %e,
                        "Row failed, recording error result"
                    );
                    CommuteResult::failed()
                },
            };
            results.push(result);

            progress.report(progress_percent(index + 1, total));
            tokio::task::yield_now().await;
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(rows = total, failed, "Commute batch finished");
        results
    }

    /// Validate, parse, compute and store one upload
    ///
    /// Reports 0% before parsing and 100% once the result file is written.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank target, an unsupported file
    /// extension or a missing address column, and a storage error if the
    /// workbook cannot be read or written.
    #[instrument(skip(self, bytes, progress), fields(size = bytes.len()))]
    pub async fn process_upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        target: &str,
        progress: &dyn ProgressSink,
    ) -> Result<BatchSummary, ApplicationError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(DomainError::validation("请输入目标地址").into());
        }
        self.spreadsheets.validate_extension(file_name)?;

        progress.report(0);
        let table = self.spreadsheets.read_table(file_name, bytes).await?;

        let results = self.run_batch(&table, target, progress).await;
        let filename = self
            .spreadsheets
            .write_result_table(&table, &results)
            .await?;
        progress.report(100);

        let failed_rows = results.iter().filter(|r| r.is_failed()).count();
        info!(%filename, total = results.len(), failed_rows, "Result workbook written");

        Ok(BatchSummary {
            status: "success".to_string(),
            filename,
            total_processed: results.len(),
            failed_rows,
        })
    }

    /// Load a previously written result workbook
    pub async fn open_result(&self, file_name: &str) -> Result<Vec<u8>, ApplicationError> {
        self.spreadsheets.open_result(file_name).await
    }

    /// Delete stored files older than `max_age`
    #[instrument(skip(self))]
    pub async fn sweep_old_results(
        &self,
        max_age: Duration,
    ) -> Result<SweepReport, ApplicationError> {
        let report = self.spreadsheets.sweep_old_files(max_age).await?;
        if report.removed > 0 || report.failed > 0 {
            info!(
                removed = report.removed,
                failed = report.failed,
                "Swept expired files"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use domain::{CellValue, Coordinate, TransportMode};
    use parking_lot::Mutex;

    use super::*;
    use crate::ports::{MockCommutePort, MockSpreadsheetPort, NoopProgress};

    #[derive(Default)]
    struct RecordingProgress {
        updates: Mutex<Vec<u8>>,
    }

    impl ProgressSink for RecordingProgress {
        fn report(&self, percent: u8) {
            self.updates.lock().push(percent);
        }
    }

    fn table(addresses: &[&str]) -> AddressTable {
        AddressTable::from_rows(
            vec!["姓名".to_string(), "地址".to_string()],
            "地址",
            addresses
                .iter()
                .enumerate()
                .map(|(i, a)| vec![CellValue::Text(format!("p{i}")), CellValue::Text((*a).to_string())]),
        )
        .unwrap()
    }

    fn transit(distance_km: f64, duration_secs: u64) -> CommuteResult {
        CommuteResult {
            start: Coordinate::new_unchecked(121.40, 31.20),
            end: Coordinate::new_unchecked(121.50, 31.20),
            distance_km,
            duration_secs,
            mode: TransportMode::Transit,
        }
    }

    fn service(commute: MockCommutePort, sheets: MockSpreadsheetPort) -> CommuteBatchService {
        CommuteBatchService::new(Arc::new(commute), Arc::new(sheets))
    }

    #[tokio::test]
    async fn run_batch_keeps_order_and_reports_progress() {
        let mut commute = MockCommutePort::new();
        commute
            .expect_commute_info()
            .times(3)
            .returning(|start, _| {
                let secs = match start {
                    "A" => 600,
                    "B" => 1200,
                    _ => 1800,
                };
                Ok(transit(5.0, secs))
            });

        let service = service(commute, MockSpreadsheetPort::new());
        let progress = RecordingProgress::default();
        let results = service
            .run_batch(&table(&["A", "B", "C"]), "Target", &progress)
            .await;

        let secs: Vec<u64> = results.iter().map(|r| r.duration_secs).collect();
        assert_eq!(secs, vec![600, 1200, 1800]);
        assert_eq!(*progress.updates.lock(), vec![33, 66, 100]);
    }

    #[tokio::test]
    async fn failed_row_is_tagged_and_batch_continues() {
        let mut commute = MockCommutePort::new();
        commute.expect_commute_info().times(3).returning(|start, _| {
            if start == "nowhere" {
                Err(ApplicationError::CommuteInfo("geocoding failed".into()))
            } else {
                Ok(transit(3.0, 900))
            }
        });

        let service = service(commute, MockSpreadsheetPort::new());
        let results = service
            .run_batch(&table(&["A", "nowhere", "C"]), "Target", &NoopProgress)
            .await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].is_failed());
        assert!(results[1].is_failed());
        assert_eq!(results[1].start, Coordinate::zero());
        assert_eq!(results[1].duration_secs, 0);
        assert!((results[1].distance_km).abs() < f64::EPSILON);
        assert!(!results[2].is_failed());
    }

    #[tokio::test]
    async fn target_is_passed_to_every_row() {
        let mut commute = MockCommutePort::new();
        commute
            .expect_commute_info()
            .withf(|_, end| end.contains("人民广场"))
            .times(2)
            .returning(|_, _| Ok(transit(1.0, 60)));

        let service = service(commute, MockSpreadsheetPort::new());
        let results = service
            .run_batch(&table(&["A", "B"]), "人民广场", &NoopProgress)
            .await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn process_upload_writes_results_and_summarizes() {
        let mut commute = MockCommutePort::new();
        commute.expect_commute_info().times(2).returning(|start, _| {
            if start == "B" {
                Err(ApplicationError::QuotaExhausted("all keys used".into()))
            } else {
                Ok(transit(12.345, 1800))
            }
        });

        let mut sheets = MockSpreadsheetPort::new();
        sheets.expect_validate_extension().returning(|_| Ok(()));
        sheets
            .expect_read_table()
            .times(1)
            .returning(|_, _| Ok(table(&["A", "B"])));
        sheets
            .expect_write_result_table()
            .withf(|table, results| table.len() == 2 && results.len() == 2)
            .times(1)
            .returning(|_, _| Ok("commute_result_20240101_120000.xlsx".to_string()));

        let service = service(commute, sheets);
        let progress = RecordingProgress::default();
        let summary = service
            .process_upload("people.xlsx", vec![1, 2, 3], "  Target  ", &progress)
            .await
            .unwrap();

        assert_eq!(summary.status, "success");
        assert_eq!(summary.filename, "commute_result_20240101_120000.xlsx");
        assert_eq!(summary.total_processed, 2);
        assert_eq!(summary.failed_rows, 1);
        assert_eq!(*progress.updates.lock(), vec![0, 50, 100, 100]);
    }

    #[tokio::test]
    async fn process_upload_rejects_blank_target() {
        let mut sheets = MockSpreadsheetPort::new();
        sheets.expect_read_table().never();

        let service = service(MockCommutePort::new(), sheets);
        let err = service
            .process_upload("people.xlsx", vec![], "   ", &NoopProgress)
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn process_upload_rejects_bad_extension() {
        let mut sheets = MockSpreadsheetPort::new();
        sheets
            .expect_validate_extension()
            .returning(|_| Err(DomainError::validation("Unsupported file type").into()));
        sheets.expect_read_table().never();

        let service = service(MockCommutePort::new(), sheets);
        let err = service
            .process_upload("people.csv", vec![], "Target", &NoopProgress)
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn process_upload_propagates_missing_column() {
        let mut sheets = MockSpreadsheetPort::new();
        sheets.expect_validate_extension().returning(|_| Ok(()));
        sheets.expect_read_table().returning(|_, _| {
            Err(DomainError::validation("Spreadsheet must contain an '地址' column").into())
        });
        sheets.expect_write_result_table().never();

        let service = service(MockCommutePort::new(), sheets);
        let err = service
            .process_upload("people.xlsx", vec![], "Target", &NoopProgress)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("地址"));
    }

    #[tokio::test]
    async fn empty_table_still_writes_a_result() {
        let mut commute = MockCommutePort::new();
        commute.expect_commute_info().never();

        let mut sheets = MockSpreadsheetPort::new();
        sheets.expect_validate_extension().returning(|_| Ok(()));
        sheets.expect_read_table().returning(|_, _| Ok(table(&[])));
        sheets
            .expect_write_result_table()
            .returning(|_, _| Ok("commute_result_20240101_000000.xlsx".to_string()));

        let service = service(commute, sheets);
        let progress = RecordingProgress::default();
        let summary = service
            .process_upload("empty.xlsx", vec![], "Target", &progress)
            .await
            .unwrap();

        assert_eq!(summary.total_processed, 0);
        assert_eq!(*progress.updates.lock(), vec![0, 100]);
    }

    #[tokio::test]
    async fn sweep_delegates_to_storage() {
        let mut sheets = MockSpreadsheetPort::new();
        sheets
            .expect_sweep_old_files()
            .withf(|age| *age == Duration::from_secs(24 * 3600))
            .returning(|_| {
                Ok(SweepReport {
                    scanned: 3,
                    removed: 1,
                    failed: 0,
                })
            });

        let service = service(MockCommutePort::new(), sheets);
        let report = service
            .sweep_old_results(Duration::from_secs(24 * 3600))
            .await
            .unwrap();
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn summary_serializes_with_wire_names() {
        let summary = BatchSummary {
            status: "success".into(),
            filename: "f.xlsx".into(),
            total_processed: 4,
            failed_rows: 0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["filename"], "f.xlsx");
        assert_eq!(json["total_processed"], 4);
    }
}
