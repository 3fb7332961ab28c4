//! Offline batch runs
//!
//! Reads a workbook from disk, computes every row and writes the result
//! next to the other stored results, without going through the server.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use anyhow::Context;
use application::{
    BatchSummary, CommuteBatchService, CommutePort, LoggingProgress, SpreadsheetPort,
};
use tracing::info;

/// Outcome of an offline batch
#[derive(Debug)]
pub struct BatchOutcome {
    /// Summary as the server would report it
    pub summary: BatchSummary,
    /// Full path of the result workbook
    pub output: PathBuf,
    /// Wall-clock duration
    pub duration_ms: u128,
}

/// Run one workbook through the batch service
pub async fn run_batch_file(
    commute: Arc<dyn CommutePort>,
    spreadsheets: Arc<dyn SpreadsheetPort>,
    output_dir: &Path,
    input: &Path,
    target: &str,
) -> anyhow::Result<BatchOutcome> {
    let started = Instant::now();
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Cannot read {}", input.display()))?;
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .context("Input path has no file name")?;

    info!(input = %input.display(), target, "Running offline batch");

    let service = CommuteBatchService::new(commute, spreadsheets);
    let summary = service
        .process_upload(file_name, bytes, target, &LoggingProgress)
        .await?;

    Ok(BatchOutcome {
        output: output_dir.join(&summary.filename),
        summary,
        duration_ms: started.elapsed().as_millis(),
    })
}
