//! One generation run over an in-memory workbook.

use serde::Serialize;

use crate::cards::{
    extract_properties, finalize_layout_with, generate_with, layout_extent, load,
    CardWorksheetProperties, LayoutExtent,
};
use crate::conf::{LayoutOptions, US_CARD_NAME};
use crate::editor::Document;
use crate::error::Result;

/// What a run produced, for logs and the CLI summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub sheet: String,
    pub us_cards: usize,
    pub feature_attributes: Vec<String>,
    pub properties: CardWorksheetProperties,
    pub page_breaks: Vec<u32>,
    pub extent: LayoutExtent,
}

/// The saved workbook plus its report.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub bytes: Vec<u8>,
    pub report: GenerationReport,
}

/// Load, lay out and save: XLSX bytes in, XLSX bytes out.
///
/// # Errors
/// Any error from parsing, loading, layout or saving; the input is never
/// partially written.
pub fn generate_output(input: &[u8], options: &LayoutOptions) -> Result<GenerationOutput> {
    let mut document = Document::open(input)?;
    let report = run(&mut document, options)?;
    let bytes = document.save()?;
    log::debug!("saved {} bytes", bytes.len());
    Ok(GenerationOutput { bytes, report })
}

/// Run every layout stage on an open document.
///
/// # Errors
/// Any error from loading or layout.
pub fn run(document: &mut Document, options: &LayoutOptions) -> Result<GenerationReport> {
    let workbook = document.workbook_mut();

    let data = load(workbook)?;
    let properties = extract_properties(workbook)?;
    generate_with(workbook, &data, &properties, options)?;
    finalize_layout_with(workbook, US_CARD_NAME, &data, &properties, options)?;

    let page_breaks = workbook
        .require_sheet(US_CARD_NAME)?
        .row_breaks
        .clone();
    Ok(GenerationReport {
        sheet: US_CARD_NAME.to_string(),
        us_cards: data.us_cards.len(),
        extent: layout_extent(data.us_cards.len(), &properties.us),
        feature_attributes: data.feature_cards.attributes,
        properties: properties.us,
        page_breaks,
    })
}
