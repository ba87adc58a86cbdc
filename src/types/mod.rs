//! In-memory model of the parts of an XLSX workbook the layout engine touches.

mod cell;
mod dimension;
mod page;
mod workbook;

pub use cell::*;
pub use dimension::*;
pub use page::*;
pub use workbook::*;
