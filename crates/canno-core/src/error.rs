//! Error types for Canno core.

use canno_engine::engine::AddressError;
use thiserror::Error;

/// Failures at the sheet boundary. Formula problems are not errors here;
/// they are stored as `#ERR: ` cell values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("{name} is outside the {cols}x{rows} grid")]
    OutOfBounds {
        name: String,
        cols: usize,
        rows: usize,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
