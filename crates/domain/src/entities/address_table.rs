//! Uploaded address table
//!
//! An [`AddressTable`] is the header row plus every data row that carries a
//! usable address. Original cells are kept untouched so they can be written
//! back next to the computed columns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Header of the column that holds the street address
pub const DEFAULT_ADDRESS_COLUMN: &str = "地址";

/// A single spreadsheet cell, reduced to the types we write back
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,
    /// Text (also used for dates and other rendered values)
    Text(String),
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl CellValue {
    /// Render the cell as trimmed text, `None` when it holds nothing usable
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            Self::Empty => return None,
            Self::Text(s) => s.trim().to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) if f.is_finite() => f.to_string(),
            Self::Float(_) => return None,
            Self::Bool(b) => b.to_string(),
        };
        if text.is_empty() { None } else { Some(text) }
    }

    /// Whether the cell has no usable content
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One data row with a non-empty address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRow {
    /// Original cells, padded to the header width
    pub cells: Vec<CellValue>,
    /// The address taken from the address column
    pub address: String,
}

/// Header plus address rows, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressTable {
    headers: Vec<String>,
    address_column: usize,
    rows: Vec<AddressRow>,
}

impl AddressTable {
    /// Build a table from a header row and raw data rows.
    ///
    /// Rows whose address cell is missing or blank are dropped. Short rows
    /// are padded with empty cells; cells beyond the header are discarded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if no header equals
    /// `address_header` (surrounding whitespace ignored).
    pub fn from_rows(
        headers: Vec<String>,
        address_header: &str,
        raw_rows: impl IntoIterator<Item = Vec<CellValue>>,
    ) -> Result<Self, DomainError> {
        let wanted = address_header.trim();
        let address_column = headers
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Spreadsheet must contain an '{wanted}' column"
                ))
            })?;

        let width = headers.len();
        let rows = raw_rows
            .into_iter()
            .filter_map(|mut cells| {
                cells.resize(width, CellValue::Empty);
                let address = cells.get(address_column)?.as_text()?;
                Some(AddressRow { cells, address })
            })
            .collect();

        Ok(Self {
            headers,
            address_column,
            rows,
        })
    }

    /// Original header row
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of the address column
    #[must_use]
    pub const fn address_column(&self) -> usize {
        self.address_column
    }

    /// Rows in input order
    #[must_use]
    pub fn rows(&self) -> &[AddressRow] {
        &self.rows
    }

    /// Number of rows to process
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Addresses in input order
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.address.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn headers() -> Vec<String> {
        vec!["姓名".to_string(), "地址".to_string()]
    }

    #[test]
    fn finds_address_column() {
        let table = AddressTable::from_rows(
            headers(),
            DEFAULT_ADDRESS_COLUMN,
            vec![vec![text("张三"), text("人民广场")]],
        )
        .unwrap();
        assert_eq!(table.address_column(), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].address, "人民广场");
    }

    #[test]
    fn missing_address_column_is_validation_error() {
        let result = AddressTable::from_rows(
            vec!["name".to_string()],
            DEFAULT_ADDRESS_COLUMN,
            vec![vec![text("x")]],
        );
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn header_match_ignores_whitespace() {
        let table = AddressTable::from_rows(
            vec![" 地址 ".to_string()],
            DEFAULT_ADDRESS_COLUMN,
            vec![vec![text("A")]],
        )
        .unwrap();
        assert_eq!(table.address_column(), 0);
    }

    #[test]
    fn drops_rows_without_address() {
        let table = AddressTable::from_rows(
            headers(),
            DEFAULT_ADDRESS_COLUMN,
            vec![
                vec![text("a"), text("Building A")],
                vec![text("b"), CellValue::Empty],
                vec![text("c"), text("   ")],
                vec![text("d")],
                vec![text("e"), text("Building E")],
            ],
        )
        .unwrap();
        let addresses: Vec<&str> = table.addresses().collect();
        assert_eq!(addresses, vec!["Building A", "Building E"]);
    }

    #[test]
    fn pads_and_truncates_rows_to_header_width() {
        let table = AddressTable::from_rows(
            headers(),
            DEFAULT_ADDRESS_COLUMN,
            vec![vec![text("a"), text("X"), text("extra")]],
        )
        .unwrap();
        assert_eq!(table.rows()[0].cells.len(), 2);
    }

    #[test]
    fn numeric_address_is_rendered_as_text() {
        assert_eq!(CellValue::Int(42).as_text().as_deref(), Some("42"));
        assert!(CellValue::Float(f64::NAN).is_blank());
        assert!(CellValue::Empty.is_blank());
    }

    #[test]
    fn empty_table() {
        let table =
            AddressTable::from_rows(headers(), DEFAULT_ADDRESS_COLUMN, Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers().len(), 2);
    }
}
