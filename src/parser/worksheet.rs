//! Worksheet parsing - parses individual sheet XML into Sheet structs.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read};
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_range, parse_cell_ref_bytes};
use crate::error::Result;
use crate::page_setup::{parse_break, parse_page_margins, parse_page_setup};
use crate::types::{
    Cell, CellValue, ColDimension, MergeRange, RowDimension, Sheet, SheetSource, SheetState,
};
use crate::xml_helpers::{attr_bool, attr_bool_default, attr_f64, attr_string, attr_u32};

/// Sheet metadata from workbook.xml
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
    pub rel_id: String,
    pub sheet_id: u32,
    pub state: SheetState,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Default,
    }
}

/// Parse a merge range like "A1:B2"
fn parse_merge_ref(ref_str: &str) -> Option<MergeRange> {
    let (start_row, start_col, end_row, end_col) = parse_cell_range(ref_str)?;
    Some(MergeRange {
        start_row: start_row.min(end_row),
        start_col: start_col.min(end_col),
        end_row: start_row.max(end_row),
        end_col: start_col.max(end_col),
    })
}

/// Turn the raw `<v>`/`<t>` text of a cell into a typed value.
pub(super) fn resolve_cell_value(
    raw: Option<&str>,
    tag: CellTypeTag,
    shared_strings: &[String],
) -> Option<CellValue> {
    let raw = raw?;
    let value = match tag {
        CellTypeTag::Shared => {
            let idx = raw.trim().parse::<usize>().ok()?;
            let Some(s) = shared_strings.get(idx) else {
                log::warn!("shared string index {idx} out of range");
                return None;
            };
            CellValue::String(s.clone())
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Date => {
            CellValue::String(raw.to_string())
        }
        CellTypeTag::Bool => CellValue::Boolean(matches!(raw.trim(), "1" | "true" | "TRUE")),
        CellTypeTag::Error => CellValue::Error(raw.to_string()),
        CellTypeTag::Default => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::String(raw.to_string()),
        },
    };
    Some(value)
}

/// Parse a single worksheet
pub(super) fn parse_sheet<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    shared_strings: &[String],
) -> Result<Sheet> {
    let file = archive.by_name(&info.path)?;
    let mut sheet = parse_sheet_xml(BufReader::new(file), &info.name, shared_strings)?;
    sheet.state = info.state;
    sheet.source = Some(SheetSource {
        path: info.path.clone(),
        rel_id: info.rel_id.clone(),
        sheet_id: info.sheet_id,
    });
    sheet.dirty = false;
    Ok(sheet)
}

/// Parse worksheet XML from any buffered reader.
pub(super) fn parse_sheet_xml<B: BufRead>(
    reader: B,
    name: &str,
    shared_strings: &[String],
) -> Result<Sheet> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut sheet = Sheet::new(name);

    let mut buf = Vec::new();
    // 0-indexed row of the current <row>; where an r-less <row> or <c> lands.
    let mut current_row: u32 = 0;
    let mut next_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut in_sheet_pr = false;
    let mut in_row_breaks = false;

    loop {
        let event = xml.read_event_into(&mut buf)?;
        let is_start_event = matches!(event, Event::Start(_));
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                match e.local_name().as_ref() {
                    b"sheetPr" => in_sheet_pr = is_start_event,
                    b"pageSetUpPr" if in_sheet_pr => {
                        sheet.fit_to_page = attr_bool_default(e, b"fitToPage", false);
                    }
                    b"sheetFormatPr" => {
                        sheet.default_row_height = attr_f64(e, b"defaultRowHeight");
                        sheet.default_col_width = attr_f64(e, b"defaultColWidth");
                    }
                    b"col" => parse_col(e, &mut sheet),
                    b"row" => {
                        current_row =
                            attr_u32(e, b"r").map_or(next_row, |r| r.saturating_sub(1));
                        next_row = current_row.saturating_add(1);
                        next_col = 0;
                        let dim = RowDimension {
                            height: attr_f64(e, b"ht"),
                            hidden: attr_bool_default(e, b"hidden", false),
                        };
                        if dim != RowDimension::default() {
                            sheet.row_dims.insert(current_row, dim);
                        }
                    }
                    b"c" => {
                        let (row, col) = attr_string(e, b"r")
                            .and_then(|r| parse_cell_ref_bytes(r.as_bytes()))
                            .map_or((current_row, next_col), |(c, r)| (r, c));
                        next_col = col.saturating_add(1);

                        let tag = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"t")
                            .map_or(CellTypeTag::Default, |a| parse_cell_type_tag(&a.value));
                        let style_idx = attr_u32(e, b"s");

                        // Empty/self-closing cells like <c r="A1" s="2"/> carry only a style
                        let (raw, formula) = if is_start_event {
                            read_cell_children(&mut xml)?
                        } else {
                            (None, None)
                        };

                        let cell = Cell {
                            value: resolve_cell_value(raw.as_deref(), tag, shared_strings),
                            style_idx,
                            formula,
                        };
                        sheet.cells.insert((row, col), cell);
                    }
                    b"mergeCell" => {
                        if let Some(merge) = attr_string(e, b"ref").as_deref().and_then(parse_merge_ref)
                        {
                            sheet.merges.push(merge);
                        }
                    }
                    b"pageMargins" => sheet.page_margins = Some(parse_page_margins(e)),
                    b"pageSetup" => sheet.page_setup = Some(parse_page_setup(e)),
                    b"rowBreaks" => in_row_breaks = is_start_event,
                    b"brk" if in_row_breaks => {
                        if let Some(row) = parse_break(e) {
                            sheet.row_breaks.push(row);
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"sheetPr" => in_sheet_pr = false,
                b"rowBreaks" => in_row_breaks = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
}

/// `<col min max width hidden style>`; one dimension entry per covered column.
fn parse_col(e: &BytesStart, sheet: &mut Sheet) {
    let min = attr_u32(e, b"min").unwrap_or(1).max(1);
    let max = attr_u32(e, b"max").unwrap_or(min).max(min);
    let dim = ColDimension {
        width: attr_f64(e, b"width"),
        hidden: attr_bool(e, b"hidden").unwrap_or(false),
        style_idx: attr_u32(e, b"style"),
    };
    for col in min..=max {
        sheet.col_dims.insert(col - 1, dim.clone());
    }
}

/// Read the children of a `<c>` up to its end tag: value text and formula.
fn read_cell_children<B: BufRead>(
    xml: &mut Reader<B>,
) -> Result<(Option<String>, Option<String>)> {
    let mut buf = Vec::new();
    let mut value: Option<String> = None;
    let mut formula: Option<String> = None;
    // Which text-bearing element we are in: <v>, <f>, or <t> under <is>.
    let mut target: Option<&'static [u8]> = None;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref inner) => match inner.local_name().as_ref() {
                b"v" => target = Some(b"v"),
                b"f" => target = Some(b"f"),
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => target = Some(b"t"),
                _ => {}
            },
            Event::Text(ref text) => match target {
                Some(b"f") => {
                    formula
                        .get_or_insert_with(String::new)
                        .push_str(&text.unescape()?);
                }
                Some(_) => {
                    value
                        .get_or_insert_with(String::new)
                        .push_str(&text.unescape()?);
                }
                None => {}
            },
            Event::End(ref inner) => match inner.local_name().as_ref() {
                b"c" => break,
                b"rPh" => in_phonetic = false,
                b"v" | b"f" | b"t" => {
                    // <t></t> and <v></v> still denote a (blank) value
                    if target.is_some_and(|t| t != b"f") && value.is_none() {
                        value = Some(String::new());
                    }
                    target = None;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((value, formula))
}
