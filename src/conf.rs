//! Sheet names, worksheet bounds and layout option defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Card kind rendered by the layout engine; also the output sheet name.
pub const US_CARD_NAME: &str = "US";
/// Card kind whose data is loaded but not rendered.
pub const FEATURE_CARD_NAME: &str = "Feature";
/// Suffix of the sheet holding a card kind's records.
pub const DATA_SUFFIX: &str = " Data";
/// Suffix of the sheet holding a card kind's template block and settings.
pub const TEMPLATE_SUFFIX: &str = " Template";

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: u32 = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: u32 = 16_384;

/// Width of the spacer column between two cards, in character units.
pub const SPACER_COLUMN_WIDTH: f64 = 1.0;
/// Height of the spacer row between two card rows, in points.
pub const SPACER_ROW_HEIGHT: f64 = 5.0;
/// Page margin applied to every side of the output sheet, in inches.
pub const PAGE_MARGIN: f64 = 0.1;
/// Text forced into otherwise blank rows so they keep their formatting.
pub const BLANK_PLACEHOLDER: &str = " ";

/// `"US Data"`, `"Feature Data"`, ...
#[must_use]
pub fn data_sheet_name(card_name: &str) -> String {
    format!("{card_name}{DATA_SUFFIX}")
}

/// `"US Template"`, `"Feature Template"`, ...
#[must_use]
pub fn template_sheet_name(card_name: &str) -> String {
    format!("{card_name}{TEMPLATE_SUFFIX}")
}

/// Tunable constants of the card layout.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides:
///
/// ```json
/// { "spacer_row_height": 8.0, "page_margin": 0.25 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOptions {
    /// Width of spacer columns, in character units.
    pub spacer_column_width: f64,
    /// Height of spacer rows, in points.
    pub spacer_row_height: f64,
    /// Margin for all four page sides, in inches.
    pub page_margin: f64,
    /// Pages wide the sheet is scaled to when printed.
    pub fit_to_width: u32,
    /// Placeholder written into blank spacer and hidden rows.
    pub placeholder: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            spacer_column_width: SPACER_COLUMN_WIDTH,
            spacer_row_height: SPACER_ROW_HEIGHT,
            page_margin: PAGE_MARGIN,
            fit_to_width: 1,
            placeholder: BLANK_PLACEHOLDER.to_string(),
        }
    }
}

impl LayoutOptions {
    /// Decode options from a JSON document.
    ///
    /// # Errors
    /// Returns [`crate::error::CardgenError::Config`] on malformed JSON or
    /// unknown keys.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a JSON options file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a config error if
    /// it does not decode.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
