//! # Sheet Facts
//!
//! Infers the structure of human-authored spreadsheet worksheets and flattens it into
//! linear `path > column > value` facts.
//!
//! Financial statements exported from spreadsheets rarely declare a schema: a sheet may
//! hold several tables stacked or side by side, headers made of period dates, row
//! labels indented to show a hierarchy. This crate finds those tables in a single pass
//! and turns every populated cell into a self-describing line such as
//! `BALANCE SHEET > Cash & Due from Banks > October 31, 2023 > 70778000`.
//!
//! ## Pipeline
//!
//! - [`spreadsheet`]: reads an `.xlsx` workbook into a [`Worksheet`] of typed [`CellValue`]s
//! - [`inference`]: classifies header rows and tracks dataset boundaries
//! - [`facts`]: materializes datasets and flattens them into facts
//! - [`processor`]: runs the pipeline on files and persists facts as JSON
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sheet_facts::extract_facts;
//! use sheet_facts::CellValue;
//! use sheet_facts::Heuristics;
//! use sheet_facts::Worksheet;
//!
//! let period = |month, day| CellValue::from(NaiveDate::from_ymd_opt(2023, month, day).unwrap());
//! let sheet = Worksheet::from_rows("Sheet1", vec![
//!     vec![CellValue::from("Item"), period(3, 31), period(6, 30)],
//!     vec![CellValue::from("Cash"), CellValue::from(100.0), CellValue::Null],
//! ]);
//! let facts = extract_facts(&sheet, &Heuristics::default()).unwrap();
//! assert_eq!(facts, vec!["Item > Cash > March 31, 2023 > 100"]);
//! ```
mod error;
pub mod facts;
pub(crate) mod helpers;
pub mod inference;
pub mod processor;
pub mod spreadsheet;

pub use error::ResultMessage;
pub use error::SheetFactsError;
pub use facts::extract_facts;
pub use helpers::xml::XmlError;
pub use inference::Heuristics;
pub use inference::InferenceError;
pub use spreadsheet::CellValue;
pub use spreadsheet::Criteria;
pub use spreadsheet::SpreadsheetError;
pub use spreadsheet::Worksheet;
