//! Workbook-level package parts: relationships, sheet list, shared strings.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read};
use zip::ZipArchive;

use crate::error::Result;
use crate::types::SheetState;
use crate::xml_helpers::{attr_bool, attr_string, attr_string_local, attr_u32};

use super::worksheet::SheetInfo;

/// Workbook relationships parsed from xl/_rels/workbook.xml.rels
///
/// Paths are resolved relative to the xl/ directory and stored as full paths.
#[derive(Default, Debug)]
pub(super) struct WorkbookRelationships {
    /// Map of rId -> full path for worksheet relationships
    /// e.g., "rId1" -> "xl/worksheets/sheet1.xml"
    pub worksheets: HashMap<String, String>,
    /// Path to shared strings file (e.g., "xl/sharedStrings.xml")
    pub shared_strings: Option<String>,
}

/// Workbook-wide flags read alongside the sheet list.
#[derive(Default, Debug)]
pub(super) struct WorkbookProps {
    pub date1904: bool,
    pub active_tab: usize,
}

/// Resolve a relationship target against the `xl/` directory.
pub(crate) fn resolve_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Parse workbook relationships from xl/_rels/workbook.xml.rels
pub(super) fn parse_workbook_relationships<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels; // Relationships file is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr_string(e, b"Id").unwrap_or_default();
                    let target = attr_string(e, b"Target").unwrap_or_default();
                    let rel_type = attr_string(e, b"Type").unwrap_or_default();
                    let full_path = resolve_target(&target);

                    if rel_type.ends_with("/worksheet") && !id.is_empty() && !target.is_empty() {
                        rels.worksheets.insert(id, full_path);
                    } else if rel_type.ends_with("/sharedStrings") {
                        rels.shared_strings = Some(full_path);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("workbook relationships truncated: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Get sheet names, paths, and states from xl/workbook.xml
pub(super) fn get_sheet_info<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<(Vec<SheetInfo>, WorkbookProps)> {
    let file = archive.by_name("xl/workbook.xml")?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut props = WorkbookProps::default();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"workbookPr" => {
                    props.date1904 = attr_bool(e, b"date1904").unwrap_or(false);
                }
                b"workbookView" => {
                    props.active_tab = attr_u32(e, b"activeTab")
                        .and_then(|tab| usize::try_from(tab).ok())
                        .unwrap_or(0);
                }
                b"sheet" => {
                    let name = attr_string(e, b"name").unwrap_or_default();
                    let rel_id = attr_string_local(e, b"id").unwrap_or_default();
                    let state = match attr_string(e, b"state").as_deref() {
                        Some("hidden") => SheetState::Hidden,
                        Some("veryHidden") => SheetState::VeryHidden,
                        None | Some("visible") => SheetState::Visible,
                        Some(other) => {
                            log::warn!(
                                "unknown state {other:?} on sheet {name:?}; treating as visible"
                            );
                            SheetState::Visible
                        }
                    };

                    if name.is_empty() {
                        log::warn!("skipping unnamed sheet entry {rel_id:?}");
                    } else {
                        // Try to get path from relationships, fallback to default
                        let path = relationships.get(&rel_id).cloned().unwrap_or_else(|| {
                            let idx = sheets.len() + 1;
                            format!("xl/worksheets/sheet{idx}.xml")
                        });
                        let sheet_id = attr_u32(e, b"sheetId").unwrap_or_else(|| {
                            u32::try_from(sheets.len() + 1).unwrap_or(u32::MAX)
                        });
                        sheets.push(SheetInfo {
                            name,
                            path,
                            rel_id,
                            sheet_id,
                            state,
                        });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, props))
}

/// Parse shared strings from shared strings file
pub(super) fn parse_shared_strings<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<Vec<String>> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Ok(file) = archive.by_name(sst_path) else {
        return Ok(Vec::new()); // SharedStrings is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current_string = String::new();
    let mut in_si = false;
    let mut in_t = false;
    // Phonetic runs (<rPh>) carry furigana, not cell text.
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current_string.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Event::Text(ref e) if in_t => {
                current_string.push_str(&e.unescape()?);
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current_string));
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}
