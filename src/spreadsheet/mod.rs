//! # Workbook Reading
//!
//! Turns a workbook file into a [`Worksheet`]: a dense grid of typed cell values.
//! Cell storage types are resolved once here (shared strings, number formats, date
//! systems) so that everything downstream only sees [`CellValue`]s.
pub mod cell;
pub mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub mod sheet;
pub(crate) mod xlsx;

pub use cell::CellValue;
pub use cell::ValueKind;
pub use criteria::Criteria;
pub use sheet::Worksheet;

use crate::error::SheetFactsError;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported spreadsheet format '{0}'")]
    UnsupportedFormat(String),

    #[error("Workbook part '{0}' is missing")]
    MissingPartError(String),

    #[error("Spreadsheet '{0}' has no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("No worksheet in '{0}' matches the sheet criteria")]
    SheetNotFound(String),

    #[error("Invalid cell value '{value}': {message}")]
    InvalidCellValue { value: String, message: String },

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// A workbook that can hand out worksheets.
pub trait Spreadsheet {
    /// File name of the workbook
    fn name(&self) -> String;

    /// Worksheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Reads the first worksheet accepted by `criteria`.
    fn read_worksheet(&mut self, criteria: &Criteria) -> Result<Worksheet, SheetFactsError>;
}

/// Opens a workbook, choosing the reader by file extension.
pub fn open_spreadsheet(path: &Path) -> Result<Box<dyn Spreadsheet>, SheetFactsError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xltx" | "xltm" => Ok(Box::new(XlsxSpreadsheet::open(path)?)),
        _ => Err(SpreadsheetError::UnsupportedFormat(path.display().to_string()))?,
    }
}

/// Opens a workbook and reads the worksheet selected by `criteria`.
pub fn read_worksheet(path: &Path, criteria: &Criteria) -> Result<Worksheet, SheetFactsError> {
    open_spreadsheet(path)?.read_worksheet(criteria)
}
