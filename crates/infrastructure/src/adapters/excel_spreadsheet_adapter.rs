//! Excel spreadsheet adapter - Implements SpreadsheetPort with calamine
//! (reading `.xlsx`/`.xls`) and rust_xlsxwriter (writing results)

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use application::error::ApplicationError;
use application::ports::{SpreadsheetPort, SweepReport};
use async_trait::async_trait;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::Local;
use domain::{AddressTable, CellValue, CommuteResult, DomainError, RESULT_COLUMNS, ResultRow};
use rust_xlsxwriter::{Workbook, XlsxError};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::config::StorageConfig;

/// Prefix of every generated result workbook
pub const RESULT_FILE_PREFIX: &str = "commute_result_";

/// Adapter storing result workbooks in a local directory
#[derive(Debug, Clone)]
pub struct ExcelSpreadsheetAdapter {
    result_dir: PathBuf,
    allowed_extensions: Vec<String>,
    address_column: String,
}

impl ExcelSpreadsheetAdapter {
    /// Create an adapter writing into `result_dir`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created.
    pub fn new(
        result_dir: impl Into<PathBuf>,
        allowed_extensions: &[String],
        address_column: impl Into<String>,
    ) -> Result<Self, ApplicationError> {
        let result_dir = result_dir.into();
        std::fs::create_dir_all(&result_dir).map_err(|e| {
            ApplicationError::Storage(format!(
                "Cannot create result directory {}: {e}",
                result_dir.display()
            ))
        })?;

        Ok(Self {
            result_dir,
            allowed_extensions: allowed_extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            address_column: address_column.into(),
        })
    }

    /// Create an adapter from the storage settings
    pub fn from_config(config: &StorageConfig) -> Result<Self, ApplicationError> {
        Self::new(
            &config.upload_dir,
            &config.allowed_extensions,
            &config.address_column,
        )
    }

    /// Directory holding result workbooks
    #[must_use]
    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Resolve a stored file name, rejecting anything that could leave the
    /// result directory
    fn stored_path(&self, file_name: &str) -> Option<PathBuf> {
        let invalid = file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name.contains("..");
        if invalid {
            return None;
        }
        Some(self.result_dir.join(file_name))
    }

    /// Create a fresh timestamped result file
    ///
    /// The name is reserved by creating the file exclusively, so concurrent
    /// writers in the same second get `_1`, `_2`, ... suffixes.
    async fn create_result_file(
        &self,
    ) -> Result<(String, PathBuf, tokio::fs::File), ApplicationError> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut name = format!("{RESULT_FILE_PREFIX}{stamp}.xlsx");
        let mut suffix = 1;
        loop {
            let path = self.result_dir.join(&name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((name, path, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    name = format!("{RESULT_FILE_PREFIX}{stamp}_{suffix}.xlsx");
                    suffix += 1;
                },
                Err(e) => {
                    return Err(ApplicationError::Storage(format!(
                        "Cannot create {}: {e}",
                        path.display()
                    )));
                },
            }
        }
    }
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

/// Parse the first worksheet; its first row is the header
fn parse_workbook(bytes: Vec<u8>, address_column: &str) -> Result<AddressTable, ApplicationError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        DomainError::validation(format!("Could not read spreadsheet: {e}"))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DomainError::validation("Spreadsheet contains no worksheet"))?
        .map_err(|e| DomainError::validation(format!("Could not read worksheet: {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| to_cell(cell).to_string().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let data_rows = rows.map(|row| row.iter().map(to_cell).collect::<Vec<_>>());
    Ok(AddressTable::from_rows(headers, address_column, data_rows)?)
}

/// Render the original cells followed by the computed columns
fn render_workbook(table: &AddressTable, results: &[CommuteResult]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let width = table.headers().len();
    for (col, header) in table
        .headers()
        .iter()
        .map(String::as_str)
        .chain(RESULT_COLUMNS)
        .enumerate()
    {
        sheet.write_string(0, col as u16, header)?;
    }

    for (index, (row, result)) in table.rows().iter().zip(results).enumerate() {
        let r = (index + 1) as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            let c = col as u16;
            match cell {
                CellValue::Empty => {},
                CellValue::Text(s) => {
                    sheet.write_string(r, c, s)?;
                },
                CellValue::Int(i) => {
                    sheet.write_number(r, c, *i as f64)?;
                },
                CellValue::Float(f) => {
                    sheet.write_number(r, c, *f)?;
                },
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                },
            }
        }

        let computed = ResultRow::from(result);
        let base = width as u16;
        sheet.write_number(r, base, computed.longitude)?;
        sheet.write_number(r, base + 1, computed.latitude)?;
        sheet.write_number(r, base + 2, computed.distance_km)?;
        sheet.write_number(r, base + 3, computed.commute_minutes as f64)?;
        sheet.write_string(r, base + 4, &computed.transport_label)?;
    }

    workbook.save_to_buffer()
}

fn join_error(e: &tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Spreadsheet task failed: {e}"))
}

#[async_trait]
impl SpreadsheetPort for ExcelSpreadsheetAdapter {
    fn validate_extension(&self, file_name: &str) -> Result<(), ApplicationError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            _ => Err(DomainError::validation(format!(
                "仅支持{}格式的文件",
                self.allowed_extensions
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join("和")
            ))
            .into()),
        }
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn read_table(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AddressTable, ApplicationError> {
        let column = self.address_column.clone();
        let table = tokio::task::spawn_blocking(move || parse_workbook(bytes, &column))
            .await
            .map_err(|e| join_error(&e))??;

        debug!(rows = table.len(), "Spreadsheet parsed");
        Ok(table)
    }

    #[instrument(skip(self, table, results), fields(rows = table.len()))]
    async fn write_result_table(
        &self,
        table: &AddressTable,
        results: &[CommuteResult],
    ) -> Result<String, ApplicationError> {
        if table.len() != results.len() {
            return Err(DomainError::RowCountMismatch {
                rows: table.len(),
                results: results.len(),
            }
            .into());
        }

        let table = table.clone();
        let results = results.to_vec();
        let bytes = tokio::task::spawn_blocking(move || render_workbook(&table, &results))
            .await
            .map_err(|e| join_error(&e))?
            .map_err(|e| ApplicationError::Storage(format!("Cannot render result workbook: {e}")))?;

        let (name, path, mut file) = self.create_result_file().await?;
        let written = async {
            file.write_all(&bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(ApplicationError::Storage(format!(
                "Cannot write result workbook: {e}"
            )));
        }

        info!(file = %path.display(), "Result workbook saved");
        Ok(name)
    }

    #[instrument(skip(self))]
    async fn open_result(&self, file_name: &str) -> Result<Vec<u8>, ApplicationError> {
        let path = self
            .stored_path(file_name)
            .ok_or_else(|| ApplicationError::NotFound(file_name.to_string()))?;

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApplicationError::NotFound(file_name.to_string())
            } else {
                ApplicationError::Storage(format!("Cannot read {file_name}: {e}"))
            }
        })
    }

    #[instrument(skip(self))]
    async fn sweep_old_files(&self, max_age: Duration) -> Result<SweepReport, ApplicationError> {
        let mut report = SweepReport::default();

        let mut entries = match tokio::fs::read_dir(&self.result_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(report),
            Err(e) => {
                return Err(ApplicationError::Storage(format!(
                    "Cannot list {}: {e}",
                    self.result_dir.display()
                )));
            },
        };

        let now = SystemTime::now();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ApplicationError::Storage(e.to_string()))?
        {
            let path = entry.path();
            let modified = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta.modified(),
                Ok(_) => continue,
                Err(e) => Err(e),
            };
            report.scanned += 1;

            let age = match modified {
                Ok(modified) => now.duration_since(modified).unwrap_or_default(),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Cannot read file age");
                    report.failed += 1;
                    continue;
                },
            };

            if age > max_age {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {
                        debug!(file = %path.display(), age_secs = age.as_secs(), "Removed expired file");
                        report.removed += 1;
                    },
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "Cannot remove expired file");
                        report.failed += 1;
                    },
                }
            }
        }

        Ok(report)
    }
}
