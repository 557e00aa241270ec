//! Clock buffer and inverter catalogs and the per-trial candidate filter.
//!
//! The catalog is loaded once at startup and never changes. Each trial
//! narrows it to a candidate set by voltage-threshold class and drive-strength
//! window, falling back to a VT-only selection when the window is too narrow
//! to leave a usable number of cells.

#![warn(missing_docs)]

pub mod catalog;
pub mod cell;
pub mod error;
pub mod filter;

pub use catalog::{clock_inverter_pool, parse_cell_list, CellCatalog};
pub use cell::Cell;
pub use error::CellError;
pub use filter::{
    filter_by_criteria, select_candidates, CandidateSets, Selection, SelectionPolicy,
    DEFAULT_BANNED_INVERTER_PREFIX, DEFAULT_MIN_CELL_COUNT,
};
