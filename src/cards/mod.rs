//! Card layout engine.
//!
//! `load` reads records from the data sheets, `extract_properties` reads the
//! template's settings, `generate` tiles the template once per record into
//! the `"US"` sheet and `finalize_layout` sets up printing.

pub mod assembler;
pub mod binder;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod properties;
pub mod replicator;

pub use assembler::{finalize_layout, finalize_layout_with, generate, generate_with};
pub use binder::{bind_us_card, read_us_card};
pub use geometry::{
    grid_offset, intermediate_columns, intermediate_rows, layout_extent, lines_of_cards,
    next_position, page_break_count, page_break_rows, LayoutExtent,
};
pub use loader::load;
pub use model::{
    CardWorksheetProperties, CardWorksheetsProperties, FeatureCards, GridPosition,
    ProjectCardsData, UsCard, UsField,
};
pub use properties::extract_properties;
pub use replicator::{replicate_block, CellBlock};
