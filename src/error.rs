//! Structured error types for cardgen.
//!
//! Every stage of a generation run returns [`Result`]; nothing is retried
//! and the first error aborts the run.

/// All errors that can occur while reading, laying out, or writing cards.
#[derive(Debug, thiserror::Error)]
pub enum CardgenError {
    /// A sheet the layout needs is not in the workbook.
    #[error("Missing sheet: {0:?}")]
    MissingSheet(String),

    /// A header label or configuration value is absent or unusable.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The card grid would not fit inside an Excel worksheet.
    #[error("Geometry overflow: {0}")]
    GeometryOverflow(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Layout options could not be decoded.
    #[error("Layout options: {0}")]
    Config(#[from] serde_json::Error),

    /// Logger bootstrap failure.
    #[error("Logging: {0}")]
    Logging(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CardgenError>;

impl From<String> for CardgenError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for CardgenError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
