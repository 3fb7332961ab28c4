//! Result and sample file downloads

use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::{debug, instrument};

use super::common::attachment;
use crate::{error::ApiError, state::AppState};

/// Name offered to browsers for the sample workbook
pub const SAMPLE_DOWNLOAD_NAME: &str = "示例文件.xlsx";

/// Download a stored result workbook
#[instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.batch_service.open_result(&filename).await?;
    debug!(size = bytes.len(), "Serving result workbook");
    Ok(attachment(bytes, &filename))
}

/// Download the sample input workbook
#[instrument(skip(state))]
pub async fn sample(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.config.storage.sample_path();
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(attachment(bytes, SAMPLE_DOWNLOAD_NAME)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("示例文件不存在".to_string()))
        },
        Err(e) => Err(ApiError::Internal(format!(
            "Failed to read {}: {e}",
            path.display()
        ))),
    }
}
