use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Cell, CellValue, ColDimension, MergeRange, PageMargins, PageSetup, RowDimension};
use crate::error::{CardgenError, Result};

/// A complete Excel workbook, as far as the layout engine is concerned.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Index of the sheet shown when the file is opened (`activeTab`).
    pub active_sheet: usize,
    /// Whether the workbook uses the 1904 date system (Mac default)
    pub date1904: bool,
    /// Package parts of sheets removed since parsing; dropped on save.
    pub(crate) removed_parts: Vec<SheetSource>,
    /// Set when the sheet list or active tab changed since parsing.
    pub(crate) structure_dirty: bool,
}

impl Workbook {
    #[must_use]
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Look up a sheet that must exist.
    ///
    /// # Errors
    /// Returns [`CardgenError::MissingSheet`] when no sheet has that name.
    pub fn require_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheet(name)
            .ok_or_else(|| CardgenError::MissingSheet(name.to_string()))
    }

    /// Mutable variant of [`Workbook::require_sheet`].
    ///
    /// # Errors
    /// Returns [`CardgenError::MissingSheet`] when no sheet has that name.
    pub fn require_sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheet_mut(name)
            .ok_or_else(|| CardgenError::MissingSheet(name.to_string()))
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// True when saving would produce something other than the original bytes.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.structure_dirty
            || !self.removed_parts.is_empty()
            || self.sheets.iter().any(|s| s.dirty || s.source.is_none())
    }
}

/// Sheet visibility state
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetState {
    /// The `state` attribute value, `None` for visible sheets.
    #[must_use]
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Visible => None,
            Self::Hidden => Some("hidden"),
            Self::VeryHidden => Some("veryHidden"),
        }
    }
}

/// Where a parsed sheet lives inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetSource {
    /// ZIP entry, e.g. `xl/worksheets/sheet1.xml`.
    pub path: String,
    /// Relationship id in `xl/_rels/workbook.xml.rels`.
    pub rel_id: String,
    /// `sheetId` attribute in `xl/workbook.xml`.
    pub sheet_id: u32,
}

/// A single worksheet
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub state: SheetState,
    /// Sparse cells keyed by `(row, col)`, iterated row-major.
    pub(crate) cells: BTreeMap<(u32, u32), Cell>,
    pub merges: Vec<MergeRange>,
    pub row_dims: BTreeMap<u32, RowDimension>,
    pub col_dims: BTreeMap<u32, ColDimension>,
    /// `sheetFormatPr defaultRowHeight`, in points.
    pub default_row_height: Option<f64>,
    /// `sheetFormatPr defaultColWidth`, in character units.
    pub default_col_width: Option<f64>,
    pub page_margins: Option<PageMargins>,
    pub page_setup: Option<PageSetup>,
    /// `sheetPr/pageSetUpPr fitToPage`
    pub fit_to_page: bool,
    /// Row indices where manual page breaks occur
    pub row_breaks: Vec<u32>,
    /// `None` for sheets created in memory.
    pub(crate) source: Option<SheetSource>,
    /// Set by every mutation; dirty sheets are re-serialized on save.
    pub(crate) dirty: bool,
}

impl Sheet {
    /// An empty, in-memory sheet.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dirty: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    #[must_use]
    pub fn value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cell(row, col).and_then(|c| c.value.as_ref())
    }

    #[must_use]
    pub fn style_idx(&self, row: u32, col: u32) -> Option<u32> {
        self.cell(row, col).and_then(|c| c.style_idx)
    }

    /// All stored cells as `(row, col, cell)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        self.cells.iter().map(|(&(r, c), cell)| (r, c, cell))
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// One past the last row holding a cell (0 for an empty sheet).
    #[must_use]
    pub fn max_row(&self) -> u32 {
        self.cells
            .keys()
            .next_back()
            .map_or(0, |&(row, _)| row.saturating_add(1))
    }

    /// One past the last column holding a cell (0 for an empty sheet).
    #[must_use]
    pub fn max_col(&self) -> u32 {
        self.cells
            .keys()
            .map(|&(_, col)| col.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.row_dims.get(&row).is_some_and(|d| d.hidden)
    }

    #[must_use]
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_dims.get(&row).and_then(|d| d.height)
    }

    #[must_use]
    pub fn col_width(&self, col: u32) -> Option<f64> {
        self.col_dims.get(&col).and_then(|d| d.width)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// ZIP entry this sheet was parsed from, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.path.as_str())
    }
}
