//! Upload and compute handlers

use axum::{
    Json,
    extract::{Multipart, State},
    response::Response,
};
use application::BatchSummary;
use tracing::{debug, instrument};

use super::common::attachment;
use crate::{error::ApiError, state::AppState};

/// Multipart field carrying the workbook
const FILE_FIELD: &str = "file";
/// Multipart field carrying the target address
const TARGET_FIELD: &str = "target_address";

/// A validated upload
#[derive(Debug)]
pub struct Upload {
    /// Client-side file name
    pub file_name: String,
    /// Raw workbook bytes
    pub bytes: Vec<u8>,
    /// Trimmed target address
    pub target: String,
}

/// Read the `file` and `target_address` fields
///
/// Missing pieces are reported in a fixed order: file, target, file name.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut target: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("无效的上传请求: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("文件读取失败: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            },
            Some(TARGET_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("无效的目标地址: {e}")))?;
                target = Some(text);
            },
            _ => {},
        }
    }

    let Some((file_name, bytes)) = file else {
        return Err(ApiError::BadRequest("请上传文件".to_string()));
    };
    let target = target.map(|t| t.trim().to_string()).unwrap_or_default();
    if target.is_empty() {
        return Err(ApiError::BadRequest("请输入目标地址".to_string()));
    }
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("未选择文件".to_string()));
    }

    Ok(Upload {
        file_name,
        bytes,
        target,
    })
}

async fn run_upload(state: &AppState, upload: Upload) -> Result<BatchSummary, ApiError> {
    debug!(
        file = %upload.file_name,
        size = upload.bytes.len(),
        target = %upload.target,
        "Received upload"
    );

    let summary = state
        .batch_service
        .process_upload(
            &upload.file_name,
            upload.bytes,
            &upload.target,
            &state.progress,
        )
        .await?;
    Ok(summary)
}

/// Compute commutes for an uploaded workbook and store the result
#[instrument(skip(state, multipart))]
pub async fn calculate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchSummary>, ApiError> {
    let upload = read_upload(multipart).await?;
    let summary = run_upload(&state, upload).await?;
    Ok(Json(summary))
}

/// Compute commutes and answer with the result workbook itself
#[instrument(skip(state, multipart))]
pub async fn calculate_download(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await?;
    let summary = run_upload(&state, upload).await?;
    let bytes = state.batch_service.open_result(&summary.filename).await?;
    Ok(attachment(bytes, &summary.filename))
}
