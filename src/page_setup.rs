//! Page setup and print settings.
//!
//! Parses `<pageMargins>`, `<pageSetup>` and `<brk>` elements into the
//! workbook model and writes them back in worksheet order.

use quick_xml::events::BytesStart;

use crate::conf::N_NCOLS_EXCEL_MAX;
use crate::types::{PageMargins, PageSetup};
use crate::xml_helpers::{attr_f64, attr_string, attr_u32, xml_escape};

/// Parse pageMargins element
///
/// Example XML:
/// ```xml
/// <pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>
/// ```
pub fn parse_page_margins(e: &BytesStart) -> PageMargins {
    let defaults = PageMargins::default();
    PageMargins {
        left: attr_f64(e, b"left").unwrap_or(defaults.left),
        right: attr_f64(e, b"right").unwrap_or(defaults.right),
        top: attr_f64(e, b"top").unwrap_or(defaults.top),
        bottom: attr_f64(e, b"bottom").unwrap_or(defaults.bottom),
        header: attr_f64(e, b"header").unwrap_or(defaults.header),
        footer: attr_f64(e, b"footer").unwrap_or(defaults.footer),
    }
}

/// Parse pageSetup element
///
/// Example XML:
/// ```xml
/// <pageSetup paperSize="9" orientation="landscape" scale="100" fitToWidth="1" fitToHeight="0"/>
/// ```
pub fn parse_page_setup(e: &BytesStart) -> PageSetup {
    PageSetup {
        paper_size: attr_u32(e, b"paperSize"),
        orientation: attr_string(e, b"orientation"),
        scale: attr_u32(e, b"scale"),
        fit_to_width: attr_u32(e, b"fitToWidth"),
        fit_to_height: attr_u32(e, b"fitToHeight"),
    }
}

/// Parse a `<brk id="..."/>` inside `<rowBreaks>`.
pub fn parse_break(e: &BytesStart) -> Option<u32> {
    attr_u32(e, b"id")
}

pub(crate) fn write_page_margins(out: &mut String, margins: &PageMargins) {
    out.push_str(&format!(
        "<pageMargins left=\"{}\" right=\"{}\" top=\"{}\" bottom=\"{}\" header=\"{}\" footer=\"{}\"/>\n",
        margins.left, margins.right, margins.top, margins.bottom, margins.header, margins.footer
    ));
}

pub(crate) fn write_page_setup(out: &mut String, setup: &PageSetup) {
    out.push_str("<pageSetup");
    if let Some(size) = setup.paper_size {
        out.push_str(&format!(" paperSize=\"{size}\""));
    }
    if let Some(scale) = setup.scale {
        out.push_str(&format!(" scale=\"{scale}\""));
    }
    if let Some(width) = setup.fit_to_width {
        out.push_str(&format!(" fitToWidth=\"{width}\""));
    }
    if let Some(height) = setup.fit_to_height {
        out.push_str(&format!(" fitToHeight=\"{height}\""));
    }
    if let Some(ref orientation) = setup.orientation {
        out.push_str(&format!(" orientation=\"{}\"", xml_escape(orientation)));
    }
    out.push_str("/>\n");
}

pub(crate) fn write_row_breaks(out: &mut String, breaks: &[u32]) {
    if breaks.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<rowBreaks count=\"{0}\" manualBreakCount=\"{0}\">\n",
        breaks.len()
    ));
    for row in breaks {
        out.push_str(&format!(
            "<brk id=\"{row}\" max=\"{}\" man=\"1\"/>\n",
            N_NCOLS_EXCEL_MAX - 1
        ));
    }
    out.push_str("</rowBreaks>\n");
}
