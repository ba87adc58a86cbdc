//! cardgen - printable user-story cards from an XLSX workbook
//!
//! Reads card records from the `"US Data"` sheet and tiles the card design
//! of `"US Template"` once per record into a `"US"` sheet:
//! - Values, styles, merges and row/column sizes of the template block
//! - Thin spacer rows and columns between cards
//! - Fit-to-width printing, narrow margins and page breaks
//! - Settings rows hidden in the output
//!
//! Every package part the layout does not touch is copied byte-for-byte.
//!
//! # Usage
//!
//! ```no_run
//! use cardgen::{generate_output, LayoutOptions};
//!
//! let input = std::fs::read("cards.xlsx")?;
//! let output = generate_output(&input, &LayoutOptions::default())?;
//! std::fs::write("output.xlsx", &output.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// XLSX layer
pub mod cell_ref;
pub mod editor;
pub mod error;
pub mod export;
pub mod page_setup;
pub mod parser;
pub mod types;
pub mod xml_helpers;

// Card layout
pub mod cards;
pub mod conf;
pub mod logging;
pub mod pipeline;

pub use cards::{extract_properties, finalize_layout, generate, load};
pub use conf::LayoutOptions;
pub use editor::Document;
pub use error::{CardgenError, Result};
pub use pipeline::{generate_output, GenerationOutput, GenerationReport};
pub use types::*;
