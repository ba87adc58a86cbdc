//! Reads card records from the header-driven data sheets.

use std::collections::BTreeMap;

use super::model::{FeatureCards, ProjectCardsData, UsCard, UsField};
use crate::conf::{data_sheet_name, FEATURE_CARD_NAME, US_CARD_NAME};
use crate::error::{CardgenError, Result};
use crate::types::{CellValue, Sheet, Workbook};

/// Load US records and feature labels.
///
/// # Errors
/// [`CardgenError::MissingSheet`] when `"US Data"` or `"Feature Data"` is
/// absent, [`CardgenError::MalformedInput`] when a US header is missing.
pub fn load(workbook: &Workbook) -> Result<ProjectCardsData> {
    let us_sheet = workbook.require_sheet(&data_sheet_name(US_CARD_NAME))?;
    let feature_sheet = workbook.require_sheet(&data_sheet_name(FEATURE_CARD_NAME))?;

    let us_cards = load_us_cards(us_sheet)?;
    let feature_cards = load_feature_cards(feature_sheet);
    log::debug!(
        "loaded {} US cards and {} feature attributes",
        us_cards.len(),
        feature_cards.attributes.len()
    );

    Ok(ProjectCardsData {
        us_cards,
        feature_cards,
    })
}

/// Map every field to the column of its header in row 0.
///
/// The first matching column wins when a label repeats.
fn us_header_columns(sheet: &Sheet) -> Result<BTreeMap<UsField, u32>> {
    let mut columns = BTreeMap::new();
    for (_, col, cell) in sheet.cells().take_while(|&(row, _, _)| row == 0) {
        let Some(label) = cell.value.as_ref().and_then(CellValue::as_str) else {
            continue;
        };
        if let Some(field) = UsField::from_label(label) {
            columns.entry(field).or_insert(col);
        }
    }

    if let Some(missing) = UsField::ALL.into_iter().find(|f| !columns.contains_key(f)) {
        return Err(CardgenError::MalformedInput(format!(
            "sheet {:?} has no {:?} header",
            sheet.name,
            missing.label()
        )));
    }
    Ok(columns)
}

fn load_us_cards(sheet: &Sheet) -> Result<Vec<UsCard>> {
    let columns = us_header_columns(sheet)?;

    let cards = (1..sheet.max_row())
        .map(|row| {
            let mut card = UsCard::default();
            for (&field, &col) in &columns {
                card.set_field(field, sheet.value(row, col).cloned());
            }
            card
        })
        .collect();
    Ok(cards)
}

/// Non-empty header labels of row 0, in column order.
fn load_feature_cards(sheet: &Sheet) -> FeatureCards {
    let attributes = sheet
        .cells()
        .take_while(|&(row, _, _)| row == 0)
        .filter_map(|(_, _, cell)| cell.value.as_ref())
        .filter(|value| !value.is_blank())
        .map(CellValue::display)
        .collect();
    FeatureCards { attributes }
}
