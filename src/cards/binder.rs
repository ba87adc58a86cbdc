//! Writes card fields into a replicated block at fixed offsets.

use super::model::{UsCard, UsField};
use crate::editor::mutation::{clear_cell_value, set_cell_value};
use crate::types::Sheet;

/// `(field, row offset, column offset)` within a US card block. `ID` is not
/// printed.
pub const US_CARD_SLOTS: [(UsField, u32, u32); 8] = [
    (UsField::Mmf, 0, 0),
    (UsField::Feature, 0, 2),
    (UsField::Project, 0, 4),
    (UsField::Size, 1, 4),
    (UsField::Title, 2, 0),
    (UsField::DateBacklog, 3, 0),
    (UsField::DateDev, 3, 2),
    (UsField::DateDone, 3, 4),
];

/// Write `card` into the block whose top-left cell is `(anchor_row, anchor_col)`.
///
/// Absent fields clear the cell's value; the replicated style stays.
pub fn bind_us_card(sheet: &mut Sheet, card: &UsCard, anchor_row: u32, anchor_col: u32) {
    for (field, dr, dc) in US_CARD_SLOTS {
        let (row, col) = (anchor_row + dr, anchor_col + dc);
        match card.field(field) {
            Some(value) => set_cell_value(sheet, row, col, value.clone()),
            None => clear_cell_value(sheet, row, col),
        }
    }
}

/// Read back the fields [`bind_us_card`] writes. `id` is always `None`.
#[must_use]
pub fn read_us_card(sheet: &Sheet, anchor_row: u32, anchor_col: u32) -> UsCard {
    let mut card = UsCard::default();
    for (field, dr, dc) in US_CARD_SLOTS {
        let value = sheet.value(anchor_row + dr, anchor_col + dc).cloned();
        card.set_field(field, value);
    }
    card
}
