use thiserror::Error;

/// Main error type for the sheet_facts crate.
/// Aggregates errors from the standard library, the workbook reader stack and the inference engine.
#[derive(Error, Debug)]
pub enum SheetFactsError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Inference module errors
    #[error("{0}")]
    InferenceError(#[from] crate::inference::InferenceError),
}

/// Prefixes the message of a failed result, typically with the file name being processed.
pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetFactsError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetFactsError::WithContextError(format!("{}: {}", message, e)))
    }
}
