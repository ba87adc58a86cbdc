//! Package-level bookkeeping for a save: which part each sheet lands in,
//! and streaming patches of `workbook.xml`, its relationships and
//! `[Content_Types].xml`.
//!
//! Patches are event-for-event copies through quick-xml; only the elements
//! that describe the sheet list are rewritten.

use std::collections::HashSet;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::Result;
use crate::types::{SheetSource, Workbook};
use crate::xml_helpers::{attr_string, attr_u32, with_attr, without_attr};

pub(crate) const WORKBOOK_PATH: &str = "xl/workbook.xml";
pub(crate) const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";
pub(crate) const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
const CALC_CHAIN_PATH: &str = "xl/calcChain.xml";

const WORKSHEET_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

/// Where one workbook sheet is stored after the save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetPart {
    pub path: String,
    pub rel_id: String,
    pub sheet_id: u32,
    /// True for sheets created in memory; their part is written from scratch.
    pub is_new: bool,
}

/// Part assignments for every sheet, plus the parts to drop.
#[derive(Debug, Clone)]
pub(crate) struct PackagePlan {
    /// One entry per `workbook.sheets`, same order.
    pub parts: Vec<SheetPart>,
    pub removed: Vec<SheetSource>,
}

impl PackagePlan {
    /// Assign parts. New sheets get the first free `xl/worksheets/sheetN.xml`,
    /// the next `rIdN` after every id in `rel_ids`, and the next `sheetId`.
    pub fn new(workbook: &Workbook, entries: &[String], rel_ids: &[String]) -> Self {
        let taken: HashSet<&str> = entries.iter().map(String::as_str).collect();
        let mut next_rel = rel_ids
            .iter()
            .filter_map(|id| rel_number(id))
            .max()
            .unwrap_or(0);
        let mut next_sheet_id = workbook
            .sheets
            .iter()
            .filter_map(|s| s.source.as_ref())
            .chain(&workbook.removed_parts)
            .map(|s| s.sheet_id)
            .max()
            .unwrap_or(0);

        let mut new_paths: Vec<String> = Vec::new();
        let mut parts = Vec::with_capacity(workbook.sheets.len());
        for sheet in &workbook.sheets {
            if let Some(ref source) = sheet.source {
                parts.push(SheetPart {
                    path: source.path.clone(),
                    rel_id: source.rel_id.clone(),
                    sheet_id: source.sheet_id,
                    is_new: false,
                });
                continue;
            }

            let path = (1u32..)
                .map(|n| format!("xl/worksheets/sheet{n}.xml"))
                .find(|p| !taken.contains(p.as_str()) && !new_paths.contains(p))
                .unwrap_or_default();
            new_paths.push(path.clone());
            next_rel = next_rel.saturating_add(1);
            next_sheet_id = next_sheet_id.saturating_add(1);
            parts.push(SheetPart {
                path,
                rel_id: format!("rId{next_rel}"),
                sheet_id: next_sheet_id,
                is_new: true,
            });
        }

        Self {
            parts,
            removed: workbook.removed_parts.clone(),
        }
    }

    /// True for ZIP entries that must not be carried into the output.
    pub fn is_dropped(&self, entry: &str) -> bool {
        entry == CALC_CHAIN_PATH
            || self
                .removed
                .iter()
                .any(|s| s.path == entry || sheet_rels_path(&s.path) == entry)
    }

    /// `(sheet index, part)` for sheets that need a fresh part.
    pub fn new_parts(&self) -> impl Iterator<Item = (usize, &SheetPart)> + '_ {
        self.parts.iter().enumerate().filter(|(_, p)| p.is_new)
    }

    /// Sheet index stored at `entry`, if any.
    pub fn sheet_at(&self, entry: &str) -> Option<usize> {
        self.parts.iter().position(|p| !p.is_new && p.path == entry)
    }

    fn is_removed_rel(&self, rel_id: &str) -> bool {
        self.removed.iter().any(|s| s.rel_id == rel_id)
    }
}

/// `xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`
fn sheet_rels_path(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{path}.rels"),
    }
}

fn rel_number(id: &str) -> Option<u32> {
    id.strip_prefix("rId")?.parse().ok()
}

/// Relationship target relative to `xl/`.
fn relative_target(path: &str) -> String {
    path.strip_prefix("xl/")
        .map_or_else(|| format!("/{path}"), ToString::to_string)
}

/// Every `Id` in a relationships part.
pub(crate) fn collect_relationship_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let Some(id) = attr_string(e, b"Id") {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

/// Rebuild `<sheets>`, point `activeTab` at the active sheet and remap
/// sheet-scoped defined names (names scoped to a removed sheet are dropped).
pub(crate) fn patch_workbook_xml(
    xml: &[u8],
    workbook: &Workbook,
    plan: &PackagePlan,
) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut buf = Vec::new();

    // sheetId of each original <sheet>, in original tab order.
    let mut original_ids: Vec<u32> = Vec::new();
    let mut in_sheets = false;
    let mut skipping_name = false;
    let mut saw_book_views = false;
    let active = workbook.active_sheet.to_string();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::End(ref e) if skipping_name => {
                if e.local_name().as_ref() == b"definedName" {
                    skipping_name = false;
                }
            }
            _ if skipping_name => {}
            Event::End(ref e) if in_sheets && e.local_name().as_ref() == b"sheets" => {
                in_sheets = false;
                writer.write_event(Event::End(e.borrow()))?;
            }
            Event::Start(ref e) | Event::Empty(ref e) if in_sheets => {
                if e.local_name().as_ref() == b"sheet" {
                    original_ids.push(attr_u32(e, b"sheetId").unwrap_or(0));
                }
            }
            _ if in_sheets => {}
            Event::Start(ref e) if e.local_name().as_ref() == b"sheets" => {
                if !saw_book_views {
                    write_book_views(&mut writer, e, &active)?;
                }
                writer.write_event(Event::Start(e.borrow()))?;
                write_sheet_entries(&mut writer, e, workbook, plan)?;
                in_sheets = true;
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"sheets" => {
                if !saw_book_views {
                    write_book_views(&mut writer, e, &active)?;
                }
                writer.write_event(Event::Start(e.borrow()))?;
                write_sheet_entries(&mut writer, e, workbook, plan)?;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Event::Start(ref e) if e.local_name().as_ref() == b"bookViews" => {
                saw_book_views = true;
                writer.write_event(Event::Start(e.borrow()))?;
            }
            Event::Start(ref e) if e.local_name().as_ref() == b"workbookView" => {
                writer.write_event(Event::Start(with_attr(e, "activeTab", &active)))?;
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"workbookView" => {
                writer.write_event(Event::Empty(with_attr(e, "activeTab", &active)))?;
            }
            Event::Start(ref e) if e.local_name().as_ref() == b"definedName" => {
                match attr_u32(e, b"localSheetId") {
                    None => writer.write_event(Event::Start(e.borrow()))?,
                    Some(old) => match remap_local_sheet(old, &original_ids, workbook) {
                        Some(new) => writer.write_event(Event::Start(with_attr(
                            e,
                            "localSheetId",
                            &new.to_string(),
                        )))?,
                        None => {
                            log::debug!("dropping defined name scoped to removed sheet {old}");
                            skipping_name = true;
                        }
                    },
                }
            }
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn write_sheet_entries(
    writer: &mut Writer<Vec<u8>>,
    sheets_el: &BytesStart,
    workbook: &Workbook,
    plan: &PackagePlan,
) -> Result<()> {
    let sheets_name = String::from_utf8_lossy(sheets_el.name().as_ref()).into_owned();
    let prefix = sheets_name.strip_suffix("sheets").unwrap_or_default();

    for (sheet, part) in workbook.sheets.iter().zip(&plan.parts) {
        let mut el = BytesStart::new(format!("{prefix}sheet"));
        el.push_attribute(("name", sheet.name.as_str()));
        el.push_attribute(("sheetId", part.sheet_id.to_string().as_str()));
        if let Some(state) = sheet.state.as_attr() {
            el.push_attribute(("state", state));
        }
        el.push_attribute(("r:id", part.rel_id.as_str()));
        writer.write_event(Event::Empty(el))?;
    }
    Ok(())
}

/// `<bookViews>` for a workbook that had none, so the active tab survives.
/// Written just before `<sheets>`, where the schema expects it.
fn write_book_views(
    writer: &mut Writer<Vec<u8>>,
    sheets_el: &BytesStart,
    active: &str,
) -> Result<()> {
    if active == "0" {
        return Ok(());
    }
    let sheets_name = String::from_utf8_lossy(sheets_el.name().as_ref()).into_owned();
    let prefix = sheets_name.strip_suffix("sheets").unwrap_or_default();

    writer.write_event(Event::Start(BytesStart::new(format!("{prefix}bookViews"))))?;
    let mut view = BytesStart::new(format!("{prefix}workbookView"));
    view.push_attribute(("activeTab", active));
    writer.write_event(Event::Empty(view))?;
    writer.write_event(Event::End(BytesEnd::new(format!("{prefix}bookViews"))))?;
    Ok(())
}

/// New tab index of the sheet that was at tab `old`.
fn remap_local_sheet(old: u32, original_ids: &[u32], workbook: &Workbook) -> Option<usize> {
    let sheet_id = *original_ids.get(usize::try_from(old).ok()?)?;
    workbook
        .sheets
        .iter()
        .position(|s| s.source.as_ref().is_some_and(|src| src.sheet_id == sheet_id))
}

/// Drop relationships of removed sheets and the calc chain; add new sheets.
pub(crate) fn patch_workbook_rels(xml: &[u8], plan: &PackagePlan) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::Empty(ref e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attr_string(e, b"Id").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();
                if !plan.is_removed_rel(&id) && !rel_type.ends_with("/calcChain") {
                    writer.write_event(Event::Empty(e.borrow()))?;
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"Relationships" => {
                for (_, part) in plan.new_parts() {
                    let mut el = BytesStart::new("Relationship");
                    el.push_attribute(("Id", part.rel_id.as_str()));
                    el.push_attribute(("Type", WORKSHEET_REL_TYPE));
                    el.push_attribute(("Target", relative_target(&part.path).as_str()));
                    writer.write_event(Event::Empty(el))?;
                }
                writer.write_event(Event::End(e.borrow()))?;
            }
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// Drop overrides of dropped parts; add overrides for new sheets.
pub(crate) fn patch_content_types(xml: &[u8], plan: &PackagePlan) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::Empty(ref e) if e.local_name().as_ref() == b"Override" => {
                let part = attr_string(e, b"PartName").unwrap_or_default();
                if !plan.is_dropped(part.trim_start_matches('/')) {
                    writer.write_event(Event::Empty(e.borrow()))?;
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"Types" => {
                for (_, part) in plan.new_parts() {
                    let mut el = BytesStart::new("Override");
                    el.push_attribute(("PartName", format!("/{}", part.path).as_str()));
                    el.push_attribute(("ContentType", WORKSHEET_CONTENT_TYPE));
                    writer.write_event(Event::Empty(el))?;
                }
                writer.write_event(Event::End(e.borrow()))?;
            }
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// Clear `tabSelected` on every `sheetView` of an untouched sheet.
pub(crate) fn deselect_sheet_xml(xml: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::Start(ref e) if e.local_name().as_ref() == b"sheetView" => {
                writer.write_event(Event::Start(without_attr(e, b"tabSelected")))?;
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"sheetView" => {
                writer.write_event(Event::Empty(without_attr(e, b"tabSelected")))?;
            }
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}
