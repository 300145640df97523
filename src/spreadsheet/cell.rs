use crate::spreadsheet::SpreadsheetError;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;

/// Semantic kind of a cell value, decided once when the worksheet is read.
/// The inference engine compares these instead of inspecting raw representations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Text,
    Number,
    Date,
}

/// A typed worksheet cell value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl CellValue {
    /// Returns the semantic kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            CellValue::Null => ValueKind::Null,
            CellValue::Text(_) => ValueKind::Text,
            CellValue::Number(_) => ValueKind::Number,
            CellValue::Date(_) => ValueKind::Date,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    #[inline]
    pub const fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }

    #[inline]
    pub const fn is_date(&self) -> bool {
        matches!(self, CellValue::Date(_))
    }

    /// Returns the text content when this value is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Renders the value for use as a column header.
    /// Dates use `date_format`, everything else renders as in `Display`.
    pub fn to_header_string(&self, date_format: &str) -> String {
        match self {
            CellValue::Date(date) => date.format(date_format).to_string(),
            _ => self.to_string(),
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(number) if is_integral(*number) => write!(f, "{}", *number as i64),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Whole numbers that survive an `i64` round trip print without a fractional part.
fn is_integral(number: f64) -> bool {
    number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Storage type of a raw cell as found in the workbook package.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Plain numeric values
    Number,
    /// Date/time serials counted from the 1900 epoch
    NumberDateTime1900,
    /// Date serials counted from the 1900 epoch
    NumberDate1900,
    /// Time-of-day fractions, 1900 workbook
    NumberTime1900,
    /// Date/time serials counted from the 1904 epoch
    NumberDateTime1904,
    /// Date serials counted from the 1904 epoch
    NumberDate1904,
    /// Time-of-day fractions, 1904 workbook
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline or formula string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Maps built-in number format IDs with date or time semantics.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Classifies a custom number format code by scanning for date and time tokens.
    /// Literal text, escapes and bracketed sections (colors, locales) are skipped.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,
                '"' if !is_bracket => is_literal = !is_literal,
                _ if is_literal => (),
                '[' => is_bracket = true,
                ']' => is_bracket = false,
                _ if is_bracket => (),
                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    /// Converts a raw cell into its semantic value.
    ///
    /// Date and date/time formats become `CellValue::Date`; time-of-day formats stay numeric
    /// since they are not period labels. Booleans and error codes are kept as text.
    pub(crate) fn to_value(&self, raw: &str, shared_strings: &[String]) -> Result<CellValue, SpreadsheetError> {
        let invalid = |message: &str| SpreadsheetError::InvalidCellValue {
            value: raw.to_owned(),
            message: message.to_owned(),
        };
        let value = match self {
            CellType::Empty => CellValue::Null,
            CellType::Boolean => CellValue::Text(if raw == "1" { "TRUE" } else { "FALSE" }.to_owned()),
            CellType::Number | CellType::NumberTime1900 | CellType::NumberTime1904 => {
                CellValue::Number(raw.trim().parse::<f64>().map_err(|_| invalid("not a number"))?)
            }
            CellType::NumberDateTime1900 | CellType::NumberDate1900 => {
                let serial = raw.trim().parse::<f64>().map_err(|_| invalid("not a date serial"))?;
                CellValue::Date(serial_to_datetime(serial, false).ok_or_else(|| invalid("date serial out of range"))?)
            }
            CellType::NumberDateTime1904 | CellType::NumberDate1904 => {
                let serial = raw.trim().parse::<f64>().map_err(|_| invalid("not a date serial"))?;
                CellValue::Date(serial_to_datetime(serial, true).ok_or_else(|| invalid("date serial out of range"))?)
            }
            CellType::IsoDateTime => CellValue::Date(parse_iso_datetime(raw).ok_or_else(|| invalid("not an ISO 8601 date"))?),
            CellType::InlineString | CellType::Error => CellValue::Text(raw.to_owned()),
            CellType::SharedString => {
                let index = raw.trim().parse::<usize>().map_err(|_| invalid("not a shared string index"))?;
                let text = shared_strings.get(index).ok_or_else(|| invalid("shared string index out of range"))?;
                CellValue::Text(text.to_owned())
            }
        };
        Ok(value)
    }
}

/// Converts an Excel serial number to a date/time.
/// The 1900 system reproduces the Lotus 1-2-3 leap year bug (serial 60 is 1900-02-29).
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let seconds = (serial.fract() * 86_400f64).round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(chrono::NaiveTime::MIN);
    epoch
        .checked_add_signed(Duration::days(days + offset))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Parses the ISO forms written for `t="d"` cells.
fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().map(|date| date.and_time(chrono::NaiveTime::MIN)))
}
