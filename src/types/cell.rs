use serde::{Deserialize, Serialize};

/// A typed cell value as stored in the package.
///
/// Values are opaque to the layout engine: they are read from one cell and
/// written to another without conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// The text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// An empty string counts as blank; everything else carries content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// Plain-text rendering (no number formatting applied).
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::String(s) | Self::Error(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(true) => "TRUE".into(),
            Self::Boolean(false) => "FALSE".into(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// A single cell's value and style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// `None` for style-only cells.
    pub value: Option<CellValue>,
    /// Index into the workbook's `cellXfs`; styles.xml itself is never rewritten.
    pub style_idx: Option<u32>,
    /// Formula text (preserved for roundtrip save).
    pub formula: Option<String>,
}

impl Cell {
    #[must_use]
    pub fn with_value(value: CellValue) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// True when the cell shows nothing (no value, or an empty string).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.as_ref().map_or(true, CellValue::is_blank)
    }

    /// True when the cell carries neither value, style nor formula.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.value.is_none() && self.style_idx.is_none() && self.formula.is_none()
    }
}
