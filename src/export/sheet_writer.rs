//! Generates worksheet XML from a `Sheet` struct.
//!
//! Modified sheets use inline strings (`t="inlineStr"`) instead of shared
//! string references, avoiding the need to rebuild the shared string table.

use std::collections::BTreeSet;

use crate::cell_ref::{cell_ref, col_to_letter};
use crate::page_setup::{write_page_margins, write_page_setup, write_row_breaks};
use crate::types::{Cell, CellValue, ColDimension, RowDimension, Sheet};
use crate::xml_helpers::xml_escape;

/// Write a complete worksheet XML string from a `Sheet`.
///
/// `selected` marks the sheet's view as the selected tab.
pub(crate) fn write_sheet_xml(sheet: &Sheet, selected: bool) -> String {
    let mut out = String::with_capacity(4096 + sheet.cell_count() * 48);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <sheetPr>
    if sheet.fit_to_page {
        out.push_str("<sheetPr><pageSetUpPr fitToPage=\"1\"/></sheetPr>\n");
    }

    // <dimension>
    let (max_row, max_col) = (sheet.max_row(), sheet.max_col());
    if max_row > 0 && max_col > 0 {
        out.push_str(&format!(
            "<dimension ref=\"A1:{}\"/>\n",
            cell_ref(max_row - 1, max_col - 1)
        ));
    }

    // <sheetViews>
    if selected {
        out.push_str("<sheetViews><sheetView tabSelected=\"1\" workbookViewId=\"0\"/></sheetViews>\n");
    } else {
        out.push_str("<sheetViews><sheetView workbookViewId=\"0\"/></sheetViews>\n");
    }

    // <sheetFormatPr>
    out.push_str(&format!(
        "<sheetFormatPr defaultRowHeight=\"{}\"",
        sheet.default_row_height.unwrap_or(15.0)
    ));
    if let Some(width) = sheet.default_col_width {
        out.push_str(&format!(" defaultColWidth=\"{width}\""));
    }
    out.push_str("/>\n");

    // <cols>
    write_cols(&mut out, sheet);

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet);
    out.push_str("</sheetData>\n");

    // <mergeCells>
    if !sheet.merges.is_empty() {
        out.push_str(&format!("<mergeCells count=\"{}\">\n", sheet.merges.len()));
        for merge in &sheet.merges {
            out.push_str(&format!("<mergeCell ref=\"{}\"/>\n", merge.to_ref()));
        }
        out.push_str("</mergeCells>\n");
    }

    if let Some(ref margins) = sheet.page_margins {
        write_page_margins(&mut out, margins);
    }
    if let Some(ref setup) = sheet.page_setup {
        write_page_setup(&mut out, setup);
    }
    write_row_breaks(&mut out, &sheet.row_breaks);

    out.push_str("</worksheet>");
    out
}

/// Write `<cols>`, folding runs of identical adjacent columns into one range.
fn write_cols(out: &mut String, sheet: &Sheet) {
    if sheet.col_dims.is_empty() {
        return;
    }

    let mut runs: Vec<(u32, u32, &ColDimension)> = Vec::new();
    for (&col, dim) in &sheet.col_dims {
        if let Some(last) = runs.last_mut() {
            if last.1.saturating_add(1) == col && last.2 == dim {
                last.1 = col;
                continue;
            }
        }
        runs.push((col, col, dim));
    }

    out.push_str("<cols>\n");
    for (first, last, dim) in runs {
        out.push_str(&format!("<col min=\"{}\" max=\"{}\"", first + 1, last + 1));
        if let Some(width) = dim.width {
            out.push_str(&format!(" width=\"{width}\" customWidth=\"1\""));
        }
        if let Some(style) = dim.style_idx {
            out.push_str(&format!(" style=\"{style}\""));
        }
        if dim.hidden {
            out.push_str(" hidden=\"1\"");
        }
        out.push_str("/>\n");
    }
    out.push_str("</cols>\n");
}

/// Write all rows into `<sheetData>`: every row with a cell or a dimension.
fn write_sheet_data(out: &mut String, sheet: &Sheet) {
    let rows: BTreeSet<u32> = sheet
        .cells
        .keys()
        .map(|&(row, _)| row)
        .chain(sheet.row_dims.keys().copied())
        .collect();

    let mut cells = sheet.cells().peekable();
    for row in rows {
        write_row_open(out, row, sheet.row_dims.get(&row));

        let mut has_cells = false;
        while let Some((_, col, cell)) = cells.next_if(|&(r, _, _)| r == row) {
            if !has_cells {
                out.push('>');
                has_cells = true;
            }
            write_cell(out, row, col, cell);
        }

        if has_cells {
            out.push_str("</row>\n");
        } else {
            out.push_str("/>\n");
        }
    }
}

fn write_row_open(out: &mut String, row: u32, dim: Option<&RowDimension>) {
    out.push_str(&format!("<row r=\"{}\"", row + 1));
    if let Some(dim) = dim {
        if let Some(height) = dim.height {
            out.push_str(&format!(" ht=\"{height}\" customHeight=\"1\""));
        }
        if dim.hidden {
            out.push_str(" hidden=\"1\"");
        }
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, cell: &Cell) {
    out.push_str("<c r=\"");
    out.push_str(&col_to_letter(col));
    out.push_str(&(row + 1).to_string());
    out.push('"');

    if let Some(si) = cell.style_idx {
        out.push_str(&format!(" s=\"{si}\""));
    }

    let formula = cell.formula.as_deref();
    match (&cell.value, formula) {
        (None, None) => out.push_str("/>"),
        (None, Some(f)) => {
            out.push('>');
            write_formula(out, f);
            out.push_str("</c>");
        }
        (Some(CellValue::String(s)), None) => {
            // Use inline string to avoid shared string table rebuild
            out.push_str(" t=\"inlineStr\"><is>");
            write_text(out, s);
            out.push_str("</is></c>");
        }
        (Some(value), formula) => {
            match value {
                CellValue::String(_) => out.push_str(" t=\"str\">"),
                CellValue::Boolean(_) => out.push_str(" t=\"b\">"),
                CellValue::Error(_) => out.push_str(" t=\"e\">"),
                CellValue::Number(_) => out.push('>'),
            }
            if let Some(f) = formula {
                write_formula(out, f);
            }
            out.push_str("<v>");
            match value {
                CellValue::String(s) | CellValue::Error(s) => out.push_str(&xml_escape(s)),
                CellValue::Number(n) => out.push_str(&n.to_string()),
                CellValue::Boolean(b) => out.push(if *b { '1' } else { '0' }),
            }
            out.push_str("</v></c>");
        }
    }
}

fn write_formula(out: &mut String, formula: &str) {
    out.push_str("<f>");
    out.push_str(&xml_escape(formula));
    out.push_str("</f>");
}

/// `<t>` with `xml:space="preserve"` when edge whitespace must survive.
fn write_text(out: &mut String, text: &str) {
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        out.push_str("<t xml:space=\"preserve\">");
    } else {
        out.push_str("<t>");
    }
    out.push_str(&xml_escape(text));
    out.push_str("</t>");
}
