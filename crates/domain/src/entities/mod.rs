//! Domain entities - the tables and rows a batch works on

mod address_table;
mod commute_result;

pub use address_table::{AddressRow, AddressTable, CellValue, DEFAULT_ADDRESS_COLUMN};
pub use commute_result::{CommuteResult, RESULT_COLUMNS, ResultRow, round_to_cents};
