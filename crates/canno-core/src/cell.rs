//! One grid slot: a literal or a formula, its cached value and its edges.
//!
//! Parent and child edges are plain [`CellRef`] coordinates into the owning
//! sheet, never ownership. A cell is either clean (cached value valid) or
//! dirty (recomputed on the next read); literal cells are always clean.

use canno_engine::engine::{CellRef, Formula};

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub(crate) value: String,
    pub(crate) formula: Option<Formula>,
    pub(crate) dirty: bool,
    /// Cells this one reads, in formula order, duplicates kept.
    pub(crate) parents: Vec<CellRef>,
    /// Cells that read this one.
    pub(crate) children: Vec<CellRef>,
    pub(crate) evaluations: u64,
}

impl Cell {
    /// Last computed (or literal) value. May be stale while dirty.
    pub fn cached_value(&self) -> &str {
        &self.value
    }

    /// Formula text including the leading `=`, or `None` for a literal.
    pub fn formula_text(&self) -> Option<&str> {
        self.formula.as_ref().map(|f| f.text())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_empty(&self) -> bool {
        self.formula.is_none() && self.value.is_empty()
    }

    pub fn parents(&self) -> &[CellRef] {
        &self.parents
    }

    pub fn children(&self) -> &[CellRef] {
        &self.children
    }

    /// How many times this cell's formula has been evaluated.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}
