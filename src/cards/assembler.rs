//! Builds the `"US"` sheet: one template copy per record, spacers, then the
//! print layout.

use super::binder::bind_us_card;
use super::geometry::{
    check_extent, grid_offset, intermediate_columns, intermediate_rows, next_position,
    page_break_rows,
};
use super::model::{CardWorksheetsProperties, GridPosition, ProjectCardsData};
use super::replicator::{replicate_block, CellBlock};
use crate::conf::{template_sheet_name, LayoutOptions, US_CARD_NAME};
use crate::editor::mutation::{
    clone_sheet, remove_sheet, set_active_sheet, set_cell_value, set_col_dimension,
    set_page_layout, set_row_breaks, set_row_dimension, set_row_hidden,
};
use crate::error::{CardgenError, Result};
use crate::types::{CellValue, PageSetup, Workbook};

/// [`generate_with`] using default [`LayoutOptions`].
///
/// # Errors
/// See [`generate_with`].
pub fn generate(
    workbook: &mut Workbook,
    data: &ProjectCardsData,
    properties: &CardWorksheetsProperties,
) -> Result<()> {
    generate_with(workbook, data, properties, &LayoutOptions::default())
}

/// Replace the `"US"` sheet with a fresh copy of `"US Template"` holding
/// one card per US record.
///
/// Cards fill the grid row-major; the template block itself is the first
/// slot. Spacer columns and rows are resized afterwards.
///
/// # Errors
/// [`CardgenError::GeometryOverflow`] when the grid would not fit in a
/// worksheet, [`CardgenError::MissingSheet`] without a template. Both are
/// raised before the workbook is touched.
pub fn generate_with(
    workbook: &mut Workbook,
    data: &ProjectCardsData,
    properties: &CardWorksheetsProperties,
    options: &LayoutOptions,
) -> Result<()> {
    let props = &properties.us;
    let record_count = data.us_cards.len();
    let template = template_sheet_name(US_CARD_NAME);

    check_extent(record_count, props)?;
    workbook.require_sheet(&template)?;

    remove_sheet(workbook, US_CARD_NAME);
    let idx = clone_sheet(workbook, &template, US_CARD_NAME)?;
    let sheet = workbook
        .sheets
        .get_mut(idx)
        .ok_or_else(|| CardgenError::Other(format!("cloned sheet {idx} vanished")))?;

    let block = CellBlock::template(props);
    let mut position = GridPosition::default();
    for card in &data.us_cards {
        let (row_offset, col_offset) = grid_offset(
            position.vertical,
            position.horizontal,
            props.card_height,
            props.card_width,
        );
        replicate_block(sheet, &block, row_offset, col_offset);
        bind_us_card(
            sheet,
            card,
            block.anchor_row + row_offset,
            block.anchor_col + col_offset,
        );
        position = next_position(position, props.cards_per_row);
    }

    let spacer_cols = if record_count == 0 {
        Vec::new()
    } else {
        intermediate_columns(props.card_width, props.cards_per_row)
    };
    for col in spacer_cols {
        let mut dim = sheet.col_dims.get(&col).cloned().unwrap_or_default();
        dim.width = Some(options.spacer_column_width);
        set_col_dimension(sheet, col, Some(dim));
    }

    let spacer_rows = intermediate_rows(
        record_count,
        props.cards_per_row,
        props.card_height,
        props.nb_settings_rows,
    );
    for &row in &spacer_rows {
        // Keeps the spacer row from collapsing when it has no other content.
        set_cell_value(sheet, row, 0, CellValue::from(options.placeholder.as_str()));
        let mut dim = sheet.row_dims.get(&row).cloned().unwrap_or_default();
        dim.height = Some(options.spacer_row_height);
        set_row_dimension(sheet, row, Some(dim));
    }

    log::info!(
        "generated sheet {US_CARD_NAME:?}: {record_count} cards, {} spacer rows",
        spacer_rows.len()
    );
    Ok(())
}

/// [`finalize_layout_with`] using default [`LayoutOptions`].
///
/// # Errors
/// See [`finalize_layout_with`].
pub fn finalize_layout(
    workbook: &mut Workbook,
    sheet_name: &str,
    data: &ProjectCardsData,
    properties: &CardWorksheetsProperties,
) -> Result<()> {
    finalize_layout_with(workbook, sheet_name, data, properties, &LayoutOptions::default())
}

/// Print layout of a generated sheet.
///
/// Makes the sheet active, fits it to one page wide with unconstrained
/// height, sets uniform margins, replaces its row page breaks and hides the
/// settings rows (each gets a placeholder if its first cell is blank).
///
/// # Errors
/// [`CardgenError::GeometryOverflow`] when the page breaks would fall
/// outside a worksheet, [`CardgenError::MissingSheet`] when `sheet_name`
/// does not exist. Both are raised before the workbook is touched.
pub fn finalize_layout_with(
    workbook: &mut Workbook,
    sheet_name: &str,
    data: &ProjectCardsData,
    properties: &CardWorksheetsProperties,
    options: &LayoutOptions,
) -> Result<()> {
    let props = &properties.us;
    check_extent(data.us_cards.len(), props)?;
    workbook.require_sheet(sheet_name)?;
    set_active_sheet(workbook, sheet_name)?;
    let sheet = workbook.require_sheet_mut(sheet_name)?;

    let setup = PageSetup {
        fit_to_width: Some(options.fit_to_width),
        fit_to_height: Some(0),
        ..sheet.page_setup.clone().unwrap_or_default()
    };
    let margins = sheet
        .page_margins
        .clone()
        .unwrap_or_default()
        .uniform(options.page_margin);
    set_page_layout(sheet, true, Some(setup), Some(margins));

    let breaks = page_break_rows(
        data.us_cards.len(),
        props.lines_of_cards_per_page,
        props.card_height,
        props.nb_settings_rows,
    );
    log::debug!("page breaks of {sheet_name:?}: {breaks:?}");
    set_row_breaks(sheet, breaks);

    for row in 0..props.nb_settings_rows {
        // Only a missing or empty-text cell is blank; 0 and FALSE are values.
        if sheet.cell(row, 0).map_or(true, |c| c.is_blank()) {
            set_cell_value(sheet, row, 0, CellValue::from(options.placeholder.as_str()));
        }
        set_row_hidden(sheet, row, true);
    }

    Ok(())
}
