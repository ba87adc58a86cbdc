//! Grid arithmetic: card offsets, spacer rows and columns, page breaks.
//!
//! All indices are 0-based. Every card block is followed by one spacer row
//! and one spacer column, so a grid step is `card_height + 1` rows and
//! `card_width + 1` columns.

use serde::Serialize;

use super::model::{CardWorksheetProperties, GridPosition};
use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::error::{CardgenError, Result};

/// Cards that share one logical print line.
const CARDS_PER_LINE: usize = 2;

/// Offset of the block at `(vertical, horizontal)` from the template block.
#[must_use]
pub fn grid_offset(vertical: u32, horizontal: u32, card_height: u32, card_width: u32) -> (u32, u32) {
    (vertical * (card_height + 1), horizontal * (card_width + 1))
}

/// Row-major successor, wrapping after `cards_per_row` cards.
#[must_use]
pub fn next_position(position: GridPosition, cards_per_row: u32) -> GridPosition {
    let horizontal = position.horizontal + 1;
    if horizontal >= cards_per_row {
        GridPosition {
            vertical: position.vertical + 1,
            horizontal: 0,
        }
    } else {
        GridPosition {
            vertical: position.vertical,
            horizontal,
        }
    }
}

/// Columns between adjacent cards of a grid row.
#[must_use]
pub fn intermediate_columns(card_width: u32, cards_per_row: u32) -> Vec<u32> {
    (1..cards_per_row).map(|i| i * (card_width + 1) - 1).collect()
}

/// Rows between adjacent grid rows; none while every card fits in one row.
#[must_use]
pub fn intermediate_rows(
    record_count: usize,
    cards_per_row: u32,
    card_height: u32,
    starting_row: u32,
) -> Vec<u32> {
    let per_row = usize::try_from(cards_per_row).unwrap_or(usize::MAX);
    if per_row == 0 || record_count <= per_row {
        return Vec::new();
    }
    let extra_rows = u32::try_from((record_count - 1) / per_row).unwrap_or(u32::MAX);
    (1..=extra_rows)
        .map(|i| i * (card_height + 1) + starting_row - 1)
        .collect()
}

/// Logical print lines for `record_count` cards: 1 up to two cards, then
/// one more line per two further cards.
#[must_use]
pub fn lines_of_cards(record_count: usize) -> usize {
    // Count of range(2, record_count, 2), plus one.
    if record_count <= CARDS_PER_LINE {
        1
    } else {
        (record_count - 1) / CARDS_PER_LINE + 1
    }
}

/// Count of `range(lines_per_page, lines_of_cards, lines_per_page)`.
#[must_use]
pub fn page_break_count(record_count: usize, lines_of_cards_per_page: u32) -> usize {
    let step = usize::try_from(lines_of_cards_per_page).unwrap_or(usize::MAX);
    let lines = lines_of_cards(record_count);
    if step == 0 || lines <= step {
        0
    } else {
        (lines - step - 1) / step + 1
    }
}

/// Row indices carrying a manual page break.
///
/// Rows past `u32::MAX` are cut off; [`check_extent`] rejects such layouts.
#[must_use]
pub fn page_break_rows(
    record_count: usize,
    lines_of_cards_per_page: u32,
    card_height: u32,
    nb_settings_rows: u32,
) -> Vec<u32> {
    let count = page_break_count(record_count, lines_of_cards_per_page);
    if count == 0 {
        return Vec::new();
    }
    let page = page_step(lines_of_cards_per_page, card_height);
    (1..=u64::try_from(count).unwrap_or(u64::MAX))
        .map_while(|i| {
            let row = i.saturating_mul(page).saturating_add(u64::from(nb_settings_rows));
            u32::try_from(row).ok()
        })
        .collect()
}

/// Rows between two page breaks.
fn page_step(lines_of_cards_per_page: u32, card_height: u32) -> u64 {
    (u64::from(lines_of_cards_per_page) + 1)
        .saturating_mul(u64::from(card_height))
        .saturating_add(2)
}

/// Rows and columns a layout reaches (one past the last index touched).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutExtent {
    pub rows: u64,
    pub cols: u64,
}

/// Extent of the layout for `record_count` cards, including the template
/// block itself, spacers and page breaks.
#[must_use]
pub fn layout_extent(record_count: usize, props: &CardWorksheetProperties) -> LayoutExtent {
    let per_row = u64::from(props.cards_per_row.max(1));
    let records = u64::try_from(record_count).unwrap_or(u64::MAX);
    let grid_rows = records.div_ceil(per_row).max(1);
    let row_step = u64::from(props.card_height) + 1;
    let col_step = u64::from(props.card_width) + 1;

    let block_rows = u64::from(props.nb_settings_rows)
        .saturating_add(grid_rows.saturating_mul(row_step))
        .saturating_sub(1);
    let last_break = u64::try_from(page_break_count(record_count, props.lines_of_cards_per_page))
        .unwrap_or(u64::MAX)
        .saturating_mul(page_step(props.lines_of_cards_per_page, props.card_height))
        .saturating_add(u64::from(props.nb_settings_rows));

    LayoutExtent {
        rows: block_rows.max(last_break),
        cols: per_row.saturating_mul(col_step).saturating_sub(1),
    }
}

/// Reject layouts that would not fit in a worksheet.
///
/// # Errors
/// [`CardgenError::GeometryOverflow`] naming the exceeded bound.
pub fn check_extent(record_count: usize, props: &CardWorksheetProperties) -> Result<LayoutExtent> {
    let extent = layout_extent(record_count, props);
    if extent.rows > u64::from(N_NROWS_EXCEL_MAX) {
        return Err(CardgenError::GeometryOverflow(format!(
            "{record_count} cards need {} rows; a worksheet holds {N_NROWS_EXCEL_MAX}",
            extent.rows
        )));
    }
    if extent.cols > u64::from(N_NCOLS_EXCEL_MAX) {
        return Err(CardgenError::GeometryOverflow(format!(
            "{} cards per row need {} columns; a worksheet holds {N_NCOLS_EXCEL_MAX}",
            props.cards_per_row, extent.cols
        )));
    }
    Ok(extent)
}
