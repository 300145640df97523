//! Tunable thresholds of the structure inference heuristics.
//!
//! The defaults are tuned for financial statements: a label column on the left, period
//! columns to the right and indentation encoding the row hierarchy.
use crate::error::SheetFactsError;
use serde::Deserialize;
use serde::Serialize;

/// A row with at least this many date cells is a header.
pub const MIN_HEADER_DATES: usize = 2;

/// A header whose column count differs from the previous header's by more than this
/// starts an independent dataset sharing the row region.
pub const SPLIT_COLUMN_DELTA: usize = 3;

/// Label column candidates start this many columns left of the detected span.
pub const LABEL_LOOKBEHIND: usize = 2;

/// Label column candidates end this many columns right of the span's first column.
pub const LABEL_LOOKAHEAD: usize = 2;

/// Number of rows below a header inspected for label evidence.
pub const LABEL_WINDOW_ROWS: usize = 6;

/// Text cells needed inside the window for a candidate to be the label column.
pub const LABEL_MIN_TEXT_CELLS: usize = 3;

/// Display format of date column headers, e.g. "October 31, 2023".
pub const HEADER_DATE_FORMAT: &str = "%B %d, %Y";

/// Thresholds driving header detection, dataset splitting and label recovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    pub min_header_dates: usize,
    pub split_column_delta: usize,
    pub label_lookbehind: usize,
    pub label_lookahead: usize,
    pub label_window_rows: usize,
    pub label_min_text_cells: usize,
    pub header_date_format: String,
}

impl Default for Heuristics {
    fn default() -> Self {
        Heuristics {
            min_header_dates: MIN_HEADER_DATES,
            split_column_delta: SPLIT_COLUMN_DELTA,
            label_lookbehind: LABEL_LOOKBEHIND,
            label_lookahead: LABEL_LOOKAHEAD,
            label_window_rows: LABEL_WINDOW_ROWS,
            label_min_text_cells: LABEL_MIN_TEXT_CELLS,
            header_date_format: HEADER_DATE_FORMAT.to_owned(),
        }
    }
}

impl Heuristics {
    /// Parses heuristics from JSON; omitted fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, SheetFactsError> {
        Ok(serde_json::from_str(text)?)
    }
}
