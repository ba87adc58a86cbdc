//! Patch an XLSX ZIP archive with modified sheet XML.
//!
//! Unmodified entries are copied via `raw_copy_file` (zero recompression cost).
//! Dirty sheets get new XML generated, new sheets get new parts, and the
//! parts describing the sheet list are patched in place.

use std::io::{Cursor, Read, Seek, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::Result;
use crate::types::Workbook;

use super::package::{
    collect_relationship_ids, deselect_sheet_xml, patch_content_types, patch_workbook_rels,
    patch_workbook_xml, PackagePlan, CONTENT_TYPES_PATH, WORKBOOK_PATH, WORKBOOK_RELS_PATH,
};
use super::sheet_writer::write_sheet_xml;

/// Rebuild the archive from `original_data` with the workbook's changes.
///
/// Returns the new XLSX file as `Vec<u8>`.
pub(crate) fn patch_zip(original_data: &[u8], workbook: &Workbook) -> Result<Vec<u8>> {
    let cursor = Cursor::new(original_data);
    let mut archive = ZipArchive::new(cursor)?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        entries.push(archive.by_index_raw(i)?.name().to_string());
    }
    let rel_ids = match read_entry(&mut archive, WORKBOOK_RELS_PATH)? {
        Some(xml) => collect_relationship_ids(&xml)?,
        None => Vec::new(),
    };
    let plan = PackagePlan::new(workbook, &entries, &rel_ids);

    let buf: Vec<u8> = Vec::with_capacity(original_data.len());
    let mut writer = ZipWriter::new(Cursor::new(buf));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (i, name) in entries.iter().enumerate() {
        if plan.is_dropped(name) {
            log::debug!("dropping package part {name}");
            continue;
        }

        let patched = match name.as_str() {
            WORKBOOK_PATH => Some(patch_workbook_xml(
                &read_index(&mut archive, i)?,
                workbook,
                &plan,
            )?),
            WORKBOOK_RELS_PATH => Some(patch_workbook_rels(&read_index(&mut archive, i)?, &plan)?),
            CONTENT_TYPES_PATH => Some(patch_content_types(&read_index(&mut archive, i)?, &plan)?),
            _ => match plan.sheet_at(name) {
                Some(idx) => patch_sheet_part(&mut archive, i, workbook, idx)?,
                None => None,
            },
        };

        match patched {
            Some(bytes) => {
                writer.start_file(name.as_str(), options)?;
                writer.write_all(&bytes)?;
            }
            // Pass through unmodified entry (raw copy, no re-compression)
            None => writer.raw_copy_file(archive.by_index_raw(i)?)?,
        }
    }

    for (idx, part) in plan.new_parts() {
        if let Some(sheet) = workbook.sheets.get(idx) {
            log::debug!("writing new sheet {:?} to {}", sheet.name, part.path);
            let xml = write_sheet_xml(sheet, idx == workbook.active_sheet);
            writer.start_file(part.path.as_str(), options)?;
            writer.write_all(xml.as_bytes())?;
        }
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// New XML for an existing sheet part, or `None` to copy it unchanged.
fn patch_sheet_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    workbook: &Workbook,
    sheet_idx: usize,
) -> Result<Option<Vec<u8>>> {
    let Some(sheet) = workbook.sheets.get(sheet_idx) else {
        return Ok(None);
    };
    let selected = sheet_idx == workbook.active_sheet;
    if sheet.dirty {
        return Ok(Some(write_sheet_xml(sheet, selected).into_bytes()));
    }
    if workbook.structure_dirty && !selected {
        return Ok(Some(deselect_sheet_xml(&read_index(archive, index)?)?));
    }
    Ok(None)
}

fn read_index<R: Read + Seek>(archive: &mut ZipArchive<R>, index: usize) -> Result<Vec<u8>> {
    let mut file = archive.by_index(index)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let Ok(mut file) = archive.by_name(name) else {
        return Ok(None);
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(Some(data))
}
