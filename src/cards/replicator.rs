//! Copies the template cell block to another spot of the same sheet.

use serde::Serialize;

use super::model::CardWorksheetProperties;
use crate::editor::mutation::{
    add_merge, put_cell, set_cell_style, set_col_dimension, set_row_dimension,
};
use crate::types::{MergeRange, Sheet};

/// A rectangular block of cells, anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellBlock {
    pub anchor_row: u32,
    pub anchor_col: u32,
    pub height: u32,
    pub width: u32,
}

impl CellBlock {
    /// The card block of a template sheet: just below the settings rows.
    #[must_use]
    pub fn template(props: &CardWorksheetProperties) -> Self {
        Self {
            anchor_row: props.nb_settings_rows,
            anchor_col: 0,
            height: props.card_height,
            width: props.card_width,
        }
    }

    #[must_use]
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.anchor_row..self.anchor_row + self.height).contains(&row)
            && (self.anchor_col..self.anchor_col + self.width).contains(&col)
    }

    /// Every `(row, col)` in the block, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.anchor_row..self.anchor_row + self.height).flat_map(move |row| {
            (self.anchor_col..self.anchor_col + self.width).map(move |col| (row, col))
        })
    }
}

/// Copy `block` to `(anchor + offset)`.
///
/// Per cell: value, style, the source row's dimension record and the source
/// column's dimension record. A missing source cell clears the destination.
/// Merges anchored inside the block are then re-issued at the destination
/// with the same span, and the anchor's style is applied to every cell they
/// cover. A zero offset leaves the sheet untouched.
pub fn replicate_block(sheet: &mut Sheet, block: &CellBlock, row_offset: u32, col_offset: u32) {
    if row_offset == 0 && col_offset == 0 {
        return;
    }

    for (row, col) in block.cells() {
        let (dst_row, dst_col) = (row + row_offset, col + col_offset);

        let cell = sheet.cell(row, col).cloned();
        put_cell(sheet, dst_row, dst_col, cell);

        let row_dim = sheet.row_dims.get(&row).cloned();
        set_row_dimension(sheet, dst_row, row_dim);
        let col_dim = sheet.col_dims.get(&col).cloned();
        set_col_dimension(sheet, dst_col, col_dim);
    }

    let merges: Vec<MergeRange> = sheet
        .merges
        .iter()
        .filter(|m| block.contains(m.start_row, m.start_col))
        .copied()
        .collect();

    for merge in merges {
        let target = MergeRange::anchored(
            merge.start_row + row_offset,
            merge.start_col + col_offset,
            merge.height(),
            merge.width(),
        );
        add_merge(sheet, target);

        // A merge alone does not carry the anchor's borders to covered cells.
        let style = sheet.style_idx(merge.start_row, merge.start_col);
        for (row, col) in target.cells() {
            set_cell_style(sheet, row, col, style);
        }
    }
}
