//! Common test utilities and assertion helpers.
//!
//! Helpers for running the generator on fixture workbooks and inspecting
//! the package it writes, both through the parsed model and as raw parts.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Read};

use cardgen::{generate_output, GenerationReport, LayoutOptions, Sheet, Workbook};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Running The Generator
// ============================================================================

/// Generate with default options; panics on failure.
#[must_use]
pub fn generate(xlsx: &[u8]) -> (Vec<u8>, GenerationReport) {
    generate_with(xlsx, &LayoutOptions::default())
}

/// Generate with the given options; panics on failure.
#[must_use]
pub fn generate_with(xlsx: &[u8], options: &LayoutOptions) -> (Vec<u8>, GenerationReport) {
    let output = generate_output(xlsx, options).expect("generation failed");
    (output.bytes, output.report)
}

/// Parse XLSX bytes; panics on failure.
#[must_use]
pub fn parse(xlsx: &[u8]) -> Workbook {
    cardgen::parser::parse(xlsx).expect("Failed to parse output")
}

/// The named sheet of a parsed workbook; panics when absent.
#[must_use]
pub fn sheet<'a>(workbook: &'a Workbook, name: &str) -> &'a Sheet {
    workbook
        .sheet(name)
        .unwrap_or_else(|| panic!("no sheet {name:?} in {:?}", workbook.sheet_names()))
}

// ============================================================================
// Raw Package Access
// ============================================================================

/// Names of every entry in the archive, in archive order.
#[must_use]
pub fn part_names(xlsx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(xlsx)).expect("Failed to open ZIP archive");
    archive.file_names().map(str::to_string).collect()
}

/// Decompressed bytes of one archive entry.
#[must_use]
pub fn read_part_bytes(xlsx: &[u8], path: &str) -> Option<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).expect("Failed to open ZIP archive");
    let mut file = archive.by_name(path).ok()?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).expect("Failed to read entry");
    Some(buf)
}

/// One archive entry as text.
#[must_use]
pub fn read_part(xlsx: &[u8], path: &str) -> Option<String> {
    read_part_bytes(xlsx, path).map(|b| String::from_utf8(b).expect("entry is not UTF-8"))
}

/// Worksheet XML of the named sheet.
#[must_use]
pub fn sheet_xml(xlsx: &[u8], name: &str) -> String {
    let workbook = parse(xlsx);
    let path = sheet(&workbook, name)
        .source_path()
        .expect("parsed sheet has a part")
        .to_string();
    read_part(xlsx, &path).expect("sheet part missing")
}

#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// ============================================================================
// Card Assertions
// ============================================================================

/// The model value a fixture value parses back to.
#[must_use]
pub fn to_model(value: &CellValue) -> Option<cardgen::CellValue> {
    match value {
        CellValue::String(s) | CellValue::InlineString(s) => Some(cardgen::CellValue::String(s.clone())),
        CellValue::Number(n) | CellValue::Formula(_, n) => Some(cardgen::CellValue::Number(*n)),
        CellValue::Boolean(b) => Some(cardgen::CellValue::Boolean(*b)),
        CellValue::Error(e) => Some(cardgen::CellValue::Error(e.clone())),
        CellValue::Empty => None,
    }
}

/// Assert the card anchored at `(row, col)` shows generated record `i`.
pub fn assert_card(sheet: &Sheet, row: u32, col: u32, i: usize) {
    let record = us_record(i);
    // (label index in US_LABELS, row offset, column offset)
    let slots = [
        (1, 0, 0),
        (2, 0, 2),
        (3, 0, 4),
        (4, 1, 4),
        (5, 2, 0),
        (6, 3, 0),
        (7, 3, 2),
        (8, 3, 4),
    ];
    for (field, dr, dc) in slots {
        assert_eq!(
            sheet.value(row + dr, col + dc),
            to_model(&record[field]).as_ref(),
            "{} of card {i} at ({}, {})",
            US_LABELS[field],
            row + dr,
            col + dc
        );
    }
}
