use serde::{Deserialize, Serialize};

use crate::cell_ref::cell_ref;

/// A merged cell region, inclusive on both ends (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    /// Region anchored at `(row, col)` spanning `height` x `width` cells.
    #[must_use]
    pub fn anchored(row: u32, col: u32, height: u32, width: u32) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row + height.saturating_sub(1),
            end_col: col + width.saturating_sub(1),
        }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row) + 1
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col) + 1
    }

    #[must_use]
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    /// Every `(row, col)` covered by the region, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.start_row..=self.end_row)
            .flat_map(move |row| (self.start_col..=self.end_col).map(move |col| (row, col)))
    }

    /// A1:B2 notation.
    #[must_use]
    pub fn to_ref(&self) -> String {
        format!(
            "{}:{}",
            cell_ref(self.start_row, self.start_col),
            cell_ref(self.end_row, self.end_col)
        )
    }
}

/// Per-row formatting (`<row ht hidden>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowDimension {
    /// Height in points; `None` keeps the sheet default.
    pub height: Option<f64>,
    pub hidden: bool,
}

/// Per-column formatting (`<col width hidden style>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColDimension {
    /// Width in character units; `None` keeps the sheet default.
    pub width: Option<f64>,
    pub hidden: bool,
    pub style_idx: Option<u32>,
}
