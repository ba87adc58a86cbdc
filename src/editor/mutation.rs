//! Sheet and workbook mutations.
//!
//! Every function here marks what it touches as dirty so the export
//! pipeline knows which parts to regenerate.

use crate::error::{CardgenError, Result};
use crate::types::{
    Cell, CellValue, ColDimension, MergeRange, PageMargins, PageSetup, RowDimension, Sheet,
    Workbook,
};

/// Write a value into a cell, keeping its style. Any formula is dropped.
pub fn set_cell_value(sheet: &mut Sheet, row: u32, col: u32, value: CellValue) {
    let cell = sheet.cells.entry((row, col)).or_default();
    cell.value = Some(value);
    cell.formula = None;
    sheet.dirty = true;
}

/// Remove a cell's value and formula, keeping its style.
pub fn clear_cell_value(sheet: &mut Sheet, row: u32, col: u32) {
    if let Some(cell) = sheet.cells.get_mut(&(row, col)) {
        cell.value = None;
        cell.formula = None;
        if cell.is_vacant() {
            sheet.cells.remove(&(row, col));
        }
        sheet.dirty = true;
    }
}

/// Set or remove a cell's `cellXfs` index.
pub fn set_cell_style(sheet: &mut Sheet, row: u32, col: u32, style_idx: Option<u32>) {
    match style_idx {
        Some(idx) => sheet.cells.entry((row, col)).or_default().style_idx = Some(idx),
        None => {
            if let Some(cell) = sheet.cells.get_mut(&(row, col)) {
                cell.style_idx = None;
                if cell.is_vacant() {
                    sheet.cells.remove(&(row, col));
                }
            }
        }
    }
    sheet.dirty = true;
}

/// Replace a cell wholesale; `None` (or a vacant cell) removes it.
pub fn put_cell(sheet: &mut Sheet, row: u32, col: u32, cell: Option<Cell>) {
    match cell {
        Some(cell) if !cell.is_vacant() => {
            sheet.cells.insert((row, col), cell);
        }
        _ => {
            sheet.cells.remove(&(row, col));
        }
    }
    sheet.dirty = true;
}

/// Replace a row's dimension record; `None` restores the sheet default.
pub fn set_row_dimension(sheet: &mut Sheet, row: u32, dim: Option<RowDimension>) {
    match dim {
        Some(dim) if dim != RowDimension::default() => {
            sheet.row_dims.insert(row, dim);
        }
        _ => {
            sheet.row_dims.remove(&row);
        }
    }
    sheet.dirty = true;
}

/// Replace a column's dimension record; `None` restores the sheet default.
pub fn set_col_dimension(sheet: &mut Sheet, col: u32, dim: Option<ColDimension>) {
    match dim {
        Some(dim) if dim != ColDimension::default() => {
            sheet.col_dims.insert(col, dim);
        }
        _ => {
            sheet.col_dims.remove(&col);
        }
    }
    sheet.dirty = true;
}

/// Show or hide a row, keeping its height.
pub fn set_row_hidden(sheet: &mut Sheet, row: u32, hidden: bool) {
    let mut dim = sheet.row_dims.get(&row).cloned().unwrap_or_default();
    dim.hidden = hidden;
    set_row_dimension(sheet, row, Some(dim));
}

/// Replace the print settings: `sheetPr/pageSetUpPr fitToPage`,
/// `pageSetup` and `pageMargins`.
pub fn set_page_layout(
    sheet: &mut Sheet,
    fit_to_page: bool,
    setup: Option<PageSetup>,
    margins: Option<PageMargins>,
) {
    sheet.fit_to_page = fit_to_page;
    sheet.page_setup = setup;
    sheet.page_margins = margins;
    sheet.dirty = true;
}

/// Replace the manual row page breaks.
pub fn set_row_breaks(sheet: &mut Sheet, breaks: Vec<u32>) {
    sheet.row_breaks = breaks;
    sheet.dirty = true;
}

/// Register a merged region, dropping any existing merge it overlaps.
pub fn add_merge(sheet: &mut Sheet, merge: MergeRange) {
    sheet.merges.retain(|m| !m.intersects(&merge));
    sheet.merges.push(merge);
    sheet.dirty = true;
}

/// Delete a sheet by name, returning it if it existed.
///
/// A parsed sheet's package part is scheduled for removal on save. The
/// active tab keeps pointing at the same sheet where possible.
pub fn remove_sheet(workbook: &mut Workbook, name: &str) -> Option<Sheet> {
    let idx = workbook.sheet_index(name)?;
    let sheet = workbook.sheets.remove(idx);
    if let Some(source) = sheet.source.clone() {
        workbook.removed_parts.push(source);
    }
    if workbook.active_sheet > idx
        || (workbook.active_sheet == idx && idx >= workbook.sheets.len())
    {
        workbook.active_sheet = workbook.active_sheet.saturating_sub(1);
    }
    workbook.structure_dirty = true;
    log::debug!("removed sheet {name:?}");
    Some(sheet)
}

/// Append a copy of `source` named `new_name`, returning its index.
///
/// The copy carries cells, merges, dimensions and page setup. It is always
/// visible and gets a new package part on save.
///
/// # Errors
/// [`CardgenError::MissingSheet`] when `source` does not exist, or
/// [`CardgenError::MalformedInput`] when `new_name` is already taken.
pub fn clone_sheet(workbook: &mut Workbook, source: &str, new_name: &str) -> Result<usize> {
    if workbook.sheet_index(new_name).is_some() {
        return Err(CardgenError::MalformedInput(format!(
            "sheet {new_name:?} already exists"
        )));
    }
    let mut copy = workbook.require_sheet(source)?.clone();
    copy.name = new_name.to_string();
    copy.state = crate::types::SheetState::Visible;
    copy.source = None;
    copy.dirty = true;

    workbook.sheets.push(copy);
    workbook.structure_dirty = true;
    log::debug!("cloned sheet {source:?} as {new_name:?}");
    Ok(workbook.sheets.len() - 1)
}

/// Make the named sheet the one shown when the file is opened.
///
/// # Errors
/// [`CardgenError::MissingSheet`] when no sheet has that name.
pub fn set_active_sheet(workbook: &mut Workbook, name: &str) -> Result<()> {
    let idx = workbook
        .sheet_index(name)
        .ok_or_else(|| CardgenError::MissingSheet(name.to_string()))?;
    if workbook.active_sheet != idx {
        workbook.active_sheet = idx;
        workbook.structure_dirty = true;
    }
    Ok(())
}
