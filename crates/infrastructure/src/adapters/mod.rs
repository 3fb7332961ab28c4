//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod baidu_commute_adapter;
mod excel_spreadsheet_adapter;

pub use baidu_commute_adapter::BaiduCommuteAdapter;
pub use excel_spreadsheet_adapter::{ExcelSpreadsheetAdapter, RESULT_FILE_PREFIX};
