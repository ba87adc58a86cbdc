use serde::{Deserialize, Serialize};

/// Page margins in inches.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PageMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub header: f64,
    pub footer: f64,
}

impl Default for PageMargins {
    /// Excel's "Normal" preset.
    fn default() -> Self {
        Self {
            left: 0.7,
            right: 0.7,
            top: 0.75,
            bottom: 0.75,
            header: 0.3,
            footer: 0.3,
        }
    }
}

impl PageMargins {
    /// Same margin on all four sides; header/footer distances are kept.
    #[must_use]
    pub fn uniform(self, margin: f64) -> Self {
        Self {
            left: margin,
            right: margin,
            top: margin,
            bottom: margin,
            ..self
        }
    }
}

/// `<pageSetup>` attributes the layout engine reads or writes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// Paper size code (e.g., 1=Letter, 9=A4)
    pub paper_size: Option<u32>,
    pub orientation: Option<String>,
    /// Print scale percentage (10-400)
    pub scale: Option<u32>,
    /// Number of pages wide to fit to (0 = unconstrained)
    pub fit_to_width: Option<u32>,
    /// Number of pages tall to fit to (0 = unconstrained)
    pub fit_to_height: Option<u32>,
}
