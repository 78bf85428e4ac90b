//! Cell name parsing and formatting.
//!
//! Converts between spreadsheet-style names ("A1", "B2", "AA23") and
//! zero-indexed column/row coordinates. Columns use bijective base 26, so
//! there is no "zero" letter: `Z` is 25 and `AA` is 26.
//!
//! # Examples
//!
//! ```
//! use canno_engine::engine::{index_to_name, name_to_index};
//!
//! let at = name_to_index("B3").unwrap();
//! assert_eq!((at.col, at.row), (1, 2));
//! assert_eq!(index_to_name(1, 2), "B3");
//! ```
//!
//! Grid bounds are not checked here; the sheet owns that decision.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a cell name could not be turned into coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid cell reference: {0}")]
    Malformed(String),

    #[error("row must be at least 1: {0}")]
    ZeroRow(String),

    #[error("cell reference too large: {0}")]
    Overflow(String),
}

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Convert a column index to its letter run (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut letters = Vec::new();
        let mut c = col as i128;
        while c >= 0 {
            letters.push(b'A' + (c % 26) as u8);
            c = c / 26 - 1;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }
}

impl std::str::FromStr for CellRef {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        name_to_index(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

fn name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<digits>[0-9]+)$")
            .expect("cell name regex must compile")
    })
}

/// Parse a cell name such as `"AA23"` into zero-based coordinates.
pub fn name_to_index(name: &str) -> Result<CellRef, AddressError> {
    let caps = name_re()
        .captures(name)
        .ok_or_else(|| AddressError::Malformed(name.to_string()))?;

    let mut col = 0usize;
    for b in caps["letters"].to_ascii_uppercase().bytes() {
        let digit = (b - b'A') as usize + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(digit))
            .ok_or_else(|| AddressError::Overflow(name.to_string()))?;
    }

    let row: usize = caps["digits"]
        .parse()
        .map_err(|_| AddressError::Overflow(name.to_string()))?;
    if row == 0 {
        return Err(AddressError::ZeroRow(name.to_string()));
    }

    Ok(CellRef::new(col - 1, row - 1))
}

/// Render zero-based coordinates as a cell name (`(0, 0)` -> `"A1"`).
pub fn index_to_name(col: usize, row: usize) -> String {
    CellRef::new(col, row).to_string()
}

/// Parse a range like `"A1:B5"` into its two corners, in the order written.
pub fn parse_range(range: &str) -> Result<(CellRef, CellRef), AddressError> {
    let (start, end) = range
        .split_once(':')
        .ok_or_else(|| AddressError::Malformed(range.to_string()))?;
    Ok((name_to_index(start)?, name_to_index(end)?))
}
