//! Main XLSX parser
//!
//! Orchestrates the parsing of all components from the ZIP archive.

mod relationships;
mod worksheet;

use std::io::Cursor;
use zip::ZipArchive;

use crate::error::Result;
use crate::types::Workbook;

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};
use worksheet::parse_sheet;

/// Parse an XLSX file from bytes into the editable workbook model.
///
/// Styles, themes and every other package part are left untouched in the
/// archive; cells only carry their `cellXfs` index.
///
/// # Errors
/// Returns an error when the archive is unreadable or `xl/workbook.xml` or a
/// referenced worksheet is missing or malformed.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    let rels = parse_workbook_relationships(&mut archive);
    let shared_strings = parse_shared_strings(&mut archive, rels.shared_strings.as_deref())?;
    let (sheet_info, props) = get_sheet_info(&mut archive, &rels.worksheets)?;

    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in &sheet_info {
        let sheet = parse_sheet(&mut archive, info, &shared_strings)?;
        log::debug!(
            "parsed sheet {:?} from {} ({} cells, {} merges)",
            sheet.name,
            info.path,
            sheet.cell_count(),
            sheet.merges.len()
        );
        sheets.push(sheet);
    }

    let active_sheet = if props.active_tab < sheets.len() {
        props.active_tab
    } else {
        0
    };

    Ok(Workbook {
        sheets,
        active_sheet,
        date1904: props.date1904,
        removed_parts: Vec::new(),
        structure_dirty: false,
    })
}
