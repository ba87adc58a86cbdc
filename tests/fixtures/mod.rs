//! Test fixtures for generating valid XLSX files in memory.
//!
//! [`XlsxBuilder`] writes a complete package (content types, relationships,
//! workbook, styles, shared strings, theme and one part per sheet) so tests
//! can feed known inputs to `cardgen` without binary assets on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{card_workbook, XlsxBuilder};
//!
//! let xlsx = card_workbook(3).build();
//! let output = cardgen::generate_output(&xlsx, &Default::default()).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell Values
// ============================================================================

/// A cell value as written into the fixture package.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A shared string.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// An error value (e.g., "#DIV/0!").
    Error(String),
    /// An inline string (not shared).
    InlineString(String),
    /// A formula with its cached numeric result.
    Formula(String, f64),
    /// An empty cell (style only).
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// A cell in the sheet.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
    /// Index into the fixture's `cellXfs`.
    pub style: Option<u32>,
}

/// A column width definition (1-based, inclusive).
#[derive(Debug, Clone)]
pub struct ColumnWidth {
    pub min: u32,
    pub max: u32,
    pub width: f64,
    pub hidden: bool,
}

/// A row height definition (1-based).
#[derive(Debug, Clone)]
pub struct RowHeight {
    pub row: u32,
    pub height: Option<f64>,
    pub hidden: bool,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub hidden: bool,
    pub cells: Vec<CellEntry>,
    pub merges: Vec<String>,
    pub col_widths: Vec<ColumnWidth>,
    pub row_heights: Vec<RowHeight>,
    /// 1-based rows a manual page break follows.
    pub row_breaks: Vec<u32>,
    pub page_margins: Option<[f64; 6]>,
    pub fit_to_page: bool,
    /// Raw XML appended after the modelled elements (drawings, legacy parts...).
    pub extra_xml: Option<String>,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a cell with a value and optional style index.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V, style: Option<u32>) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            style,
        });
        self
    }

    /// Add an empty cell with only a style.
    #[must_use]
    pub fn styled_cell(mut self, cell_ref: &str, style: u32) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: CellValue::Empty,
            style: Some(style),
        });
        self
    }

    /// Add a merge range (e.g., "A1:B2").
    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_string());
        self
    }

    /// Set column width for a range of columns.
    #[must_use]
    pub fn col_width(mut self, min: u32, max: u32, width: f64) -> Self {
        self.col_widths.push(ColumnWidth {
            min,
            max,
            width,
            hidden: false,
        });
        self
    }

    /// Set row height.
    #[must_use]
    pub fn row_height(mut self, row: u32, height: f64) -> Self {
        self.row_heights.push(RowHeight {
            row,
            height: Some(height),
            hidden: false,
        });
        self
    }

    /// Hide a row.
    #[must_use]
    pub fn hide_row(mut self, row: u32) -> Self {
        self.row_heights.push(RowHeight {
            row,
            height: None,
            hidden: true,
        });
        self
    }

    /// Mark the sheet as hidden in the workbook.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Add a manual page break after a 1-based row.
    #[must_use]
    pub fn row_break(mut self, row: u32) -> Self {
        self.row_breaks.push(row);
        self
    }

    /// Set `left, right, top, bottom, header, footer` margins.
    #[must_use]
    pub fn page_margins(mut self, margins: [f64; 6]) -> Self {
        self.page_margins = Some(margins);
        self
    }

    /// Set `sheetPr/pageSetUpPr@fitToPage`.
    #[must_use]
    pub fn fit_to_page(mut self) -> Self {
        self.fit_to_page = true;
        self
    }

    /// Append raw XML at the end of the worksheet.
    #[must_use]
    pub fn extra_xml(mut self, xml: &str) -> Self {
        self.extra_xml = Some(xml.to_string());
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// A `definedName` entry of the workbook.
#[derive(Debug, Clone)]
pub struct DefinedName {
    pub name: String,
    /// Sheet position the name is scoped to.
    pub local_sheet_id: Option<usize>,
    pub formula: String,
}

/// Builder for creating complete XLSX files.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    active_tab: Option<usize>,
    defined_names: Vec<DefinedName>,
    calc_chain: bool,
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Set `bookViews/workbookView@activeTab` and select that sheet's tab.
    #[must_use]
    pub fn active_tab(mut self, idx: usize) -> Self {
        self.active_tab = Some(idx);
        self
    }

    /// Add a defined name, optionally scoped to a sheet position.
    #[must_use]
    pub fn defined_name(mut self, name: &str, local_sheet_id: Option<usize>, formula: &str) -> Self {
        self.defined_names.push(DefinedName {
            name: name.to_string(),
            local_sheet_id,
            formula: formula.to_string(),
        });
        self
    }

    /// Write `xl/calcChain.xml` listing every formula cell.
    #[must_use]
    pub fn with_calc_chain(mut self) -> Self {
        self.calc_chain = true;
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let CellValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }
        let has_strings = !shared_strings.is_empty();
        let calc_chain = self.calc_chain.then(|| generate_calc_chain(&self.sheets));

        let mut parts: Vec<(String, String)> = vec![
            (
                "[Content_Types].xml".into(),
                generate_content_types(self.sheets.len(), has_strings, calc_chain.is_some()),
            ),
            ("_rels/.rels".into(), generate_rels()),
            (
                "xl/_rels/workbook.xml.rels".into(),
                generate_workbook_rels(self.sheets.len(), has_strings, calc_chain.is_some()),
            ),
            (
                "xl/workbook.xml".into(),
                generate_workbook(&self.sheets, self.active_tab, &self.defined_names),
            ),
            ("xl/styles.xml".into(), generate_styles()),
            ("xl/theme/theme1.xml".into(), generate_theme()),
        ];
        if has_strings {
            parts.push((
                "xl/sharedStrings.xml".into(),
                generate_shared_strings(&shared_strings),
            ));
        }
        if let Some(chain) = calc_chain {
            parts.push(("xl/calcChain.xml".into(), chain));
        }
        let active = self.active_tab.unwrap_or(0);
        for (i, sheet) in self.sheets.iter().enumerate() {
            parts.push((
                format!("xl/worksheets/sheet{}.xml", i + 1),
                generate_sheet_xml(sheet, &shared_strings, i == active),
            ));
        }

        for (path, xml) in parts {
            zip.start_file(path, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

// ============================================================================
// Card Workbooks
// ============================================================================

/// US data header labels, in the column order the fixtures use.
pub const US_LABELS: [&str; 9] = [
    "ID",
    "MMF",
    "FEATURE",
    "PROJECT",
    "SIZE",
    "TITLE",
    "DATE_BACKLOG",
    "DATE_DEV",
    "DATE_DONE",
];

/// Style indices of the fixture `cellXfs`.
pub const STYLE_HEADER: u32 = 1;
pub const STYLE_TITLE: u32 = 2;
pub const STYLE_DATE: u32 = 3;

/// Settings rows, card height, card width, cards per row, card lines per page.
pub type Settings = [i32; 5];

/// Five settings rows, 4x5 cards, two per row, two lines of cards per page.
pub const DEFAULT_SETTINGS: Settings = [5, 4, 5, 2, 2];

/// A template sheet: settings in `A1:B5`, a styled card block right below.
///
/// Block layout relative to its anchor (0-based): labels on rows 0, 1 and 3,
/// a title merged across the block width on row 2 (taller than the rest).
#[must_use]
pub fn us_template_sheet(settings: Settings) -> SheetBuilder {
    let labels = [
        "NB_SETTINGS_ROWS",
        "CARD_HEIGHT",
        "CARD_WIDTH",
        "CARDS_PER_ROW",
        "LINES_OF_CARDS_PER_PAGE",
    ];
    let mut sheet = SheetBuilder::new("US Template");
    for (i, (label, value)) in labels.iter().zip(settings).enumerate() {
        let row = i + 1;
        sheet = sheet
            .cell(&format!("A{row}"), *label, None)
            .cell(&format!("B{row}"), value, None);
    }

    let top = settings[0] as u32 + 1;
    let width = settings[2] as u32;
    let last_col = col_num_to_letter(width);
    sheet
        .cell(&format!("A{top}"), "MMF", Some(STYLE_HEADER))
        .cell(&format!("C{top}"), "FEATURE", Some(STYLE_HEADER))
        .cell(&format!("E{top}"), "PROJECT", Some(STYLE_HEADER))
        .cell(&format!("E{}", top + 1), "SIZE", Some(STYLE_HEADER))
        .cell(&format!("A{}", top + 2), "TITLE", Some(STYLE_TITLE))
        .styled_cell(&format!("B{}", top + 2), STYLE_TITLE)
        .merge(&format!("A{}:{last_col}{}", top + 2, top + 2))
        .cell(&format!("A{}", top + 3), "BACKLOG", Some(STYLE_DATE))
        .cell(&format!("C{}", top + 3), "DEV", Some(STYLE_DATE))
        .cell(&format!("E{}", top + 3), "DONE", Some(STYLE_DATE))
        .row_height(top + 2, 40.0)
        .col_width(1, width, 12.0)
}

/// Field values of the `i`-th generated US record, in [`US_LABELS`] order.
#[must_use]
pub fn us_record(i: usize) -> Vec<CellValue> {
    vec![
        CellValue::Number(i as f64 + 1.0),
        format!("MMF-{i}").into(),
        format!("Feature {i}").into(),
        "Portal".into(),
        CellValue::Number((i % 5) as f64 + 1.0),
        format!("Story {i}").into(),
        CellValue::Number(45_292.0 + i as f64),
        CellValue::Empty,
        CellValue::Empty,
    ]
}

/// A data sheet with `labels` in row 1 and one row per record below.
///
/// [`CellValue::Empty`] leaves the cell out entirely.
#[must_use]
pub fn data_sheet(name: &str, labels: &[&str], records: &[Vec<CellValue>]) -> SheetBuilder {
    let mut sheet = SheetBuilder::new(name);
    for (c, label) in labels.iter().enumerate() {
        sheet = sheet.cell(&format!("{}1", col_num_to_letter(c as u32 + 1)), *label, None);
    }
    for (r, record) in records.iter().enumerate() {
        for (c, value) in record.iter().enumerate() {
            if *value != CellValue::Empty {
                let cell_ref = format!("{}{}", col_num_to_letter(c as u32 + 1), r + 2);
                sheet = sheet.cell(&cell_ref, value.clone(), None);
            }
        }
    }
    sheet
}

/// `"US Data"` with `count` generated records.
#[must_use]
pub fn us_data_sheet(count: usize) -> SheetBuilder {
    let records: Vec<_> = (0..count).map(us_record).collect();
    data_sheet("US Data", &US_LABELS, &records)
}

/// `"Feature Data"` with a header row only.
#[must_use]
pub fn feature_data_sheet() -> SheetBuilder {
    data_sheet("Feature Data", &["NAME", "DESCRIPTION", "OWNER"], &[])
}

/// Template, US data and feature data with default settings.
#[must_use]
pub fn card_workbook(count: usize) -> XlsxBuilder {
    card_workbook_with(DEFAULT_SETTINGS, count)
}

/// Template, US data and feature data with the given settings.
#[must_use]
pub fn card_workbook_with(settings: Settings, count: usize) -> XlsxBuilder {
    XlsxBuilder::new()
        .sheet(us_template_sheet(settings))
        .sheet(us_data_sheet(count))
        .sheet(feature_data_sheet())
}

// ============================================================================
// XML Generators
// ============================================================================

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Generate [Content_Types].xml
fn generate_content_types(sheet_count: usize, shared_strings: bool, calc_chain: bool) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    if shared_strings {
        xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    }
    if calc_chain {
        xml.push_str(r#"<Override PartName="/xl/calcChain.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.calcChain+xml"/>"#);
    }
    for i in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

/// Generate _rels/.rels
fn generate_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    )
}

/// Generate xl/_rels/workbook.xml.rels
///
/// Sheets take `rId1..=rIdN`; styles, theme and the optional parts follow.
fn generate_workbook_rels(sheet_count: usize, shared_strings: bool, calc_chain: bool) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{PKG_REL_NS}">"#);

    let mut rid = 1;
    for i in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{rid}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        );
        rid += 1;
    }

    let mut others = vec![("styles", "styles.xml"), ("theme", "theme/theme1.xml")];
    if shared_strings {
        others.push(("sharedStrings", "sharedStrings.xml"));
    }
    if calc_chain {
        others.push(("calcChain", "calcChain.xml"));
    }
    for (kind, target) in others {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{rid}" Type="{REL_NS}/{kind}" Target="{target}"/>"#
        );
        rid += 1;
    }

    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/workbook.xml
fn generate_workbook(
    sheets: &[SheetBuilder],
    active_tab: Option<usize>,
    defined_names: &[DefinedName],
) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#);
    xml.push_str(r#"<workbookPr defaultThemeVersion="164011"/>"#);
    if let Some(tab) = active_tab {
        let _ = write!(xml, r#"<bookViews><workbookView activeTab="{tab}"/></bookViews>"#);
    }

    xml.push_str("<sheets>");
    for (i, sheet) in sheets.iter().enumerate() {
        let state = if sheet.hidden { r#" state="hidden""# } else { "" };
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{}"{state} r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            i + 1
        );
    }
    xml.push_str("</sheets>");

    if !defined_names.is_empty() {
        xml.push_str("<definedNames>");
        for name in defined_names {
            let scope = name
                .local_sheet_id
                .map(|id| format!(r#" localSheetId="{id}""#))
                .unwrap_or_default();
            let _ = write!(
                xml,
                r#"<definedName name="{}"{scope}>{}</definedName>"#,
                escape_xml(&name.name),
                escape_xml(&name.formula)
            );
        }
        xml.push_str("</definedNames>");
    }

    xml.push_str(r#"<calcPr calcId="191029"/>"#);
    xml.push_str("</workbook>");
    xml
}

/// Generate xl/styles.xml with four cell formats: default, bold header,
/// wrapped title with a fill, date.
fn generate_styles() -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<styleSheet xmlns="{MAIN_NS}">"#);
    xml.push_str(r#"<numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/></numFmts>"#);
    xml.push_str(r#"<fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts>"#);
    xml.push_str(r#"<fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFFFF2CC"/></patternFill></fill></fills>"#);
    xml.push_str(r#"<borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"/><right style="thin"/><top style="thin"/><bottom style="thin"/><diagonal/></border></borders>"#);
    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
    xml.push_str(r#"<cellXfs count="4">"#);
    xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#);
    xml.push_str(r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="1" xfId="0" applyFont="1" applyBorder="1"/>"#);
    xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="2" borderId="1" xfId="0" applyFill="1" applyBorder="1" applyAlignment="1"><alignment wrapText="1" vertical="center"/></xf>"#);
    xml.push_str(r#"<xf numFmtId="164" fontId="0" fillId="0" borderId="1" xfId="0" applyNumberFormat="1" applyBorder="1"/>"#);
    xml.push_str("</cellXfs>");
    xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
    xml.push_str("</styleSheet>");
    xml
}

/// Generate xl/sharedStrings.xml
fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(
        xml,
        r#"<sst xmlns="{MAIN_NS}" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    );
    for s in strings {
        // Add xml:space="preserve" to preserve leading/trailing whitespace
        let _ = write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape_xml(s));
    }
    xml.push_str("</sst>");
    xml
}

/// Generate a small xl/theme/theme1.xml
fn generate_theme() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements>"#);
    xml.push_str(r#"<a:clrScheme name="Office"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1></a:clrScheme>"#);
    xml.push_str(r#"<a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/></a:minorFont></a:fontScheme>"#);
    xml.push_str("</a:themeElements></a:theme>");
    xml
}

/// Generate xl/calcChain.xml listing every formula cell.
fn generate_calc_chain(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<calcChain xmlns="{MAIN_NS}">"#);
    for (i, sheet) in sheets.iter().enumerate() {
        for cell in &sheet.cells {
            if matches!(cell.value, CellValue::Formula(..)) {
                let _ = write!(xml, r#"<c r="{}" i="{}"/>"#, cell.cell_ref, i + 1);
            }
        }
    }
    xml.push_str("</calcChain>");
    xml
}

/// Convert column number (1-indexed) to letter(s).
pub fn col_num_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    if result.is_empty() {
        result.push('A');
    }
    result
}

/// Parse a cell reference like "A1" into (col, row) as 1-indexed.
fn parse_cell_ref(cell_ref: &str) -> (u32, u32) {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut in_letters = true;

    for c in cell_ref.chars() {
        if in_letters && c.is_ascii_alphabetic() {
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        } else {
            in_letters = false;
            if c.is_ascii_digit() {
                row = row * 10 + (c as u32 - '0' as u32);
            }
        }
    }

    (col, row)
}

/// Generate a sheet XML file
fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String], selected: bool) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#);

    if sheet.fit_to_page {
        xml.push_str(r#"<sheetPr><pageSetUpPr fitToPage="1"/></sheetPr>"#);
    }
    let tab_selected = if selected { r#" tabSelected="1""# } else { "" };
    let _ = write!(
        xml,
        r#"<sheetViews><sheetView{tab_selected} workbookViewId="0"/></sheetViews>"#
    );
    xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

    if !sheet.col_widths.is_empty() {
        xml.push_str("<cols>");
        for col in &sheet.col_widths {
            let hidden = if col.hidden { r#" hidden="1""# } else { "" };
            let _ = write!(
                xml,
                r#"<col min="{}" max="{}" width="{}" customWidth="1"{hidden}/>"#,
                col.min, col.max, col.width
            );
        }
        xml.push_str("</cols>");
    }

    // Rows with cells and rows with only a height both need a <row>.
    let mut rows: BTreeMap<u32, Vec<&CellEntry>> = BTreeMap::new();
    for cell in &sheet.cells {
        let (_, row) = parse_cell_ref(&cell.cell_ref);
        rows.entry(row).or_default().push(cell);
    }
    for rh in &sheet.row_heights {
        rows.entry(rh.row).or_default();
    }

    xml.push_str("<sheetData>");
    for (row_num, mut cells) in rows {
        cells.sort_by_key(|c| parse_cell_ref(&c.cell_ref).0);
        let mut row_attrs = format!(r#"r="{row_num}""#);
        if let Some(rh) = sheet.row_heights.iter().find(|rh| rh.row == row_num) {
            if let Some(height) = rh.height {
                let _ = write!(row_attrs, r#" ht="{height}" customHeight="1""#);
            }
            if rh.hidden {
                row_attrs.push_str(r#" hidden="1""#);
            }
        }
        let _ = write!(xml, "<row {row_attrs}>");

        for cell in cells {
            let mut cell_attrs = format!(r#"r="{}""#, cell.cell_ref);
            if let Some(style) = cell.style {
                let _ = write!(cell_attrs, r#" s="{style}""#);
            }

            match &cell.value {
                CellValue::String(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap_or(0);
                    let _ = write!(xml, r#"<c {cell_attrs} t="s"><v>{idx}</v></c>"#);
                }
                CellValue::Number(n) => {
                    let _ = write!(xml, r#"<c {cell_attrs}><v>{n}</v></c>"#);
                }
                CellValue::Boolean(b) => {
                    let v = u8::from(*b);
                    let _ = write!(xml, r#"<c {cell_attrs} t="b"><v>{v}</v></c>"#);
                }
                CellValue::Error(e) => {
                    let _ = write!(xml, r#"<c {cell_attrs} t="e"><v>{}</v></c>"#, escape_xml(e));
                }
                CellValue::InlineString(s) => {
                    let _ = write!(
                        xml,
                        r#"<c {cell_attrs} t="inlineStr"><is><t>{}</t></is></c>"#,
                        escape_xml(s)
                    );
                }
                CellValue::Formula(f, cached) => {
                    let _ = write!(
                        xml,
                        r#"<c {cell_attrs}><f>{}</f><v>{cached}</v></c>"#,
                        escape_xml(f)
                    );
                }
                CellValue::Empty => {
                    let _ = write!(xml, r#"<c {cell_attrs}/>"#);
                }
            }
        }

        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !sheet.merges.is_empty() {
        let _ = write!(xml, r#"<mergeCells count="{}">"#, sheet.merges.len());
        for merge in &sheet.merges {
            let _ = write!(xml, r#"<mergeCell ref="{merge}"/>"#);
        }
        xml.push_str("</mergeCells>");
    }

    if let Some([left, right, top, bottom, header, footer]) = sheet.page_margins {
        let _ = write!(
            xml,
            r#"<pageMargins left="{left}" right="{right}" top="{top}" bottom="{bottom}" header="{header}" footer="{footer}"/>"#
        );
    }

    if !sheet.row_breaks.is_empty() {
        let n = sheet.row_breaks.len();
        let _ = write!(xml, r#"<rowBreaks count="{n}" manualBreakCount="{n}">"#);
        for id in &sheet.row_breaks {
            let _ = write!(xml, r#"<brk id="{id}" max="16383" man="1"/>"#);
        }
        xml.push_str("</rowBreaks>");
    }

    if let Some(extra) = &sheet.extra_xml {
        xml.push_str(extra);
    }

    xml.push_str("</worksheet>");
    xml
}
