//! Layout configuration stored in the template sheet's settings rows.
//!
//! Column B of rows 1-5 (0-based rows 0-4) holds, in order: settings row
//! count, card height, card width, cards per row, card lines per page.

use super::model::{CardWorksheetProperties, CardWorksheetsProperties};
use crate::cell_ref::cell_ref;
use crate::conf::{template_sheet_name, US_CARD_NAME};
use crate::error::{CardgenError, Result};
use crate::types::{CellValue, Sheet, Workbook};

const SETTINGS_COLUMN: u32 = 1;
const NB_SETTINGS_ROWS_IDX: u32 = 0;
const CARD_HEIGHT_IDX: u32 = 1;
const CARD_WIDTH_IDX: u32 = 2;
const CARDS_PER_ROW_IDX: u32 = 3;
const LINES_OF_CARDS_PER_PAGE_IDX: u32 = 4;

/// Read the properties of every card template.
///
/// # Errors
/// [`CardgenError::MissingSheet`] without a `"US Template"` sheet;
/// [`CardgenError::MalformedInput`] for a blank, non-integer or negative
/// setting, or a zero size, row width or page height.
pub fn extract_properties(workbook: &Workbook) -> Result<CardWorksheetsProperties> {
    let sheet = workbook.require_sheet(&template_sheet_name(US_CARD_NAME))?;
    let us = CardWorksheetProperties {
        nb_settings_rows: read_count(sheet, NB_SETTINGS_ROWS_IDX, false)?,
        card_height: read_count(sheet, CARD_HEIGHT_IDX, true)?,
        card_width: read_count(sheet, CARD_WIDTH_IDX, true)?,
        cards_per_row: read_count(sheet, CARDS_PER_ROW_IDX, true)?,
        lines_of_cards_per_page: read_count(sheet, LINES_OF_CARDS_PER_PAGE_IDX, true)?,
    };
    log::debug!("template properties of {:?}: {us:?}", sheet.name);
    Ok(CardWorksheetsProperties { us })
}

fn read_count(sheet: &Sheet, row: u32, positive: bool) -> Result<u32> {
    let malformed = |detail: &str| {
        CardgenError::MalformedInput(format!(
            "{}!{} {detail}",
            sheet.name,
            cell_ref(row, SETTINGS_COLUMN)
        ))
    };

    let count = match sheet.value(row, SETTINGS_COLUMN) {
        None => return Err(malformed("is blank")),
        Some(CellValue::Number(n)) => whole_count(*n),
        Some(CellValue::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    }
    .ok_or_else(|| malformed("is not a non-negative whole number"))?;

    if positive && count == 0 {
        return Err(malformed("must be greater than zero"));
    }
    Ok(count)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_count(n: f64) -> Option<u32> {
    // Whole and in range, so the cast is exact.
    (n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n)).then(|| n as u32)
}
