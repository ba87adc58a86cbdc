//! XLSX export pipeline.
//!
//! Produces a modified XLSX by patching the original ZIP archive.
//! Only dirty sheets are re-serialized; everything else is passed through
//! byte-identical.

mod package;
pub(crate) mod sheet_writer;
pub(crate) mod zip_patcher;

use crate::error::Result;
use crate::types::Workbook;

/// Save a workbook to XLSX bytes.
///
/// `original_bytes` is the package the workbook was parsed from (needed
/// for the ZIP roundtrip). Returns the new XLSX file as `Vec<u8>`.
///
/// # Errors
/// Propagates ZIP and XML errors while reading or rewriting parts.
pub fn save_xlsx(original_bytes: &[u8], workbook: &Workbook) -> Result<Vec<u8>> {
    if !workbook.is_modified() {
        // Nothing changed
        return Ok(original_bytes.to_vec());
    }

    zip_patcher::patch_zip(original_bytes, workbook)
}
