//! Editable XLSX document.
//!
//! `Document` pairs the original package bytes with the parsed `Workbook`,
//! adding:
//! - Sheet and cell mutation (see [`mutation`])
//! - Dirty tracking per sheet
//! - XLSX save (roundtrip via the export pipeline)

pub mod mutation;

use std::path::Path;

use crate::error::Result;
use crate::types::Workbook;

/// An opened workbook plus the bytes it came from.
///
/// The workbook is exclusively owned; every layout stage borrows it
/// mutably through [`Document::workbook_mut`].
#[derive(Debug, Clone)]
pub struct Document {
    original_bytes: Vec<u8>,
    workbook: Workbook,
}

impl Document {
    /// Parse an XLSX file from bytes.
    ///
    /// # Errors
    /// Propagates archive and XML errors from [`crate::parser::parse`].
    pub fn open(data: &[u8]) -> Result<Self> {
        let workbook = crate::parser::parse(data)?;
        Ok(Self {
            original_bytes: data.to_vec(),
            workbook,
        })
    }

    /// Read and parse an XLSX file from disk.
    ///
    /// # Errors
    /// I/O errors reading `path`, then anything [`Document::open`] reports.
    pub fn open_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        log::debug!("read {} bytes from {}", data.len(), path.display());
        Self::open(&data)
    }

    #[must_use]
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    /// Check if any edits have been made.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.workbook.is_modified()
    }

    /// Save the workbook to XLSX bytes.
    ///
    /// If nothing was edited, returns the original bytes.
    ///
    /// # Errors
    /// Propagates ZIP and XML errors from the export pipeline.
    pub fn save(&self) -> Result<Vec<u8>> {
        crate::export::save_xlsx(&self.original_bytes, &self.workbook)
    }

    /// Save to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Export errors, or I/O errors writing `path`.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let bytes = self.save()?;
        std::fs::write(path, &bytes)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
