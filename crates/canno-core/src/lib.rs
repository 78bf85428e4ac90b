//! canno-core - sheet model: cells, dependency graph, lazy recalculation.

pub mod cell;
pub mod error;
pub mod sheet;

pub use cell::Cell;
pub use error::{Result, SheetError};
pub use sheet::{SHEET_COLS, SHEET_ROWS, Sheet};

pub use canno_engine::engine::{CellRef, index_to_name, name_to_index};
