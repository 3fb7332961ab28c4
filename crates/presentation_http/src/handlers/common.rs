//! Shared helpers for HTTP handlers

use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

/// MIME type of `.xlsx` workbooks
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build a `Content-Disposition` value that survives non-ASCII names
///
/// Non-ASCII characters are replaced by `_` in the plain `filename`
/// parameter; the exact name travels percent-encoded in `filename*`.
pub fn content_disposition(download_name: &str) -> String {
    let fallback: String = download_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(download_name)
    )
}

/// Wrap workbook bytes as a file download
pub fn attachment(bytes: Vec<u8>, download_name: &str) -> Response {
    let disposition = HeaderValue::from_str(&content_disposition(download_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
