//! The fixed-size grid and its dependency graph.
//!
//! A [`Sheet`] owns every [`Cell`] for its whole lifetime. Writes rewire
//! parent/child edges and mark dependents dirty; reads recompute dirty
//! formula cells on demand, pulling parent values as needed.

use std::collections::HashSet;

use canno_engine::engine::{
    CellRef, CellSource, EvalError, Formula, index_to_name, name_to_index,
};

use crate::cell::Cell;
use crate::error::{Result, SheetError};

pub const SHEET_COLS: usize = 50;
pub const SHEET_ROWS: usize = 50;

#[derive(Debug, Clone)]
pub struct Sheet {
    /// Column-major: index = col * SHEET_ROWS + row.
    cells: Vec<Cell>,
    /// Cells whose formula is currently being evaluated.
    in_flight: HashSet<CellRef>,
}

impl Sheet {
    /// Create a sheet with every slot holding an empty literal.
    pub fn new() -> Self {
        Sheet {
            cells: vec![Cell::default(); SHEET_COLS * SHEET_ROWS],
            in_flight: HashSet::new(),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (SHEET_COLS, SHEET_ROWS)
    }

    pub fn contains(&self, at: CellRef) -> bool {
        at.col < SHEET_COLS && at.row < SHEET_ROWS
    }

    fn index(&self, at: CellRef) -> Option<usize> {
        self.contains(at).then(|| Self::slot(at))
    }

    /// Resolve a cell name to in-grid coordinates.
    pub fn locate(&self, name: &str) -> Result<CellRef> {
        let at = name_to_index(name)?;
        self.check_bounds(at)
    }

    fn check_bounds(&self, at: CellRef) -> Result<CellRef> {
        if self.contains(at) {
            Ok(at)
        } else {
            Err(SheetError::OutOfBounds {
                name: index_to_name(at.col, at.row),
                cols: SHEET_COLS,
                rows: SHEET_ROWS,
            })
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.index(CellRef::new(col, row)).map(|i| &self.cells[i])
    }

    pub fn cell_by_name(&self, name: &str) -> Option<&Cell> {
        let at = self.locate(name).ok()?;
        self.cell(at.col, at.row)
    }

    /// Non-empty cells in column-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(i, cell)| (CellRef::new(i / SHEET_ROWS, i % SHEET_ROWS), cell))
    }

    pub fn set_cell(&mut self, col: usize, row: usize, text: &str) -> Result<()> {
        let at = self.check_bounds(CellRef::new(col, row))?;
        self.set_value(at, text)
    }

    pub fn set_cell_by_name(&mut self, name: &str, text: &str) -> Result<()> {
        let at = self.locate(name)?;
        self.set_value(at, text)
    }

    /// Current value of a cell, recomputing it if stale. `None` when out of range.
    pub fn get_cell_value(&mut self, col: usize, row: usize) -> Option<String> {
        self.get_value(CellRef::new(col, row))
    }

    pub fn get_cell_value_by_name(&mut self, name: &str) -> Option<String> {
        let at = self.locate(name).ok()?;
        self.get_value(at)
    }

    /// Formula text of a cell, or `None` for literals and bad coordinates.
    pub fn get_cell_formula(&self, col: usize, row: usize) -> Option<String> {
        self.get_formula(CellRef::new(col, row))
    }

    pub fn get_cell_formula_by_name(&self, name: &str) -> Option<String> {
        let at = self.locate(name).ok()?;
        self.get_formula(at)
    }

    pub fn get_formula(&self, at: CellRef) -> Option<String> {
        self.cell(at.col, at.row)?
            .formula_text()
            .map(str::to_string)
    }

    pub fn get_value(&mut self, at: CellRef) -> Option<String> {
        let idx = self.index(at)?;
        Some(self.value_at(at, idx))
    }

    /// Store `text` in the cell at `at`.
    ///
    /// `=`-prefixed text becomes a formula: its parents are recomputed from
    /// the parsed tree and the cell is left dirty. Anything else is stored
    /// as a literal. Either way every dependent is marked dirty.
    pub fn set_value(&mut self, at: CellRef, text: &str) -> Result<()> {
        let idx = self.check_bounds(at).map(Self::slot)?;

        // `Formula::new` only rejects text without the leading `=`.
        let formula = if text.starts_with('=') {
            Formula::new(text).ok()
        } else {
            None
        };
        self.unlink_parents(at, idx);

        if let Some(formula) = formula {
            let parents: Vec<CellRef> = formula
                .dependencies()
                .into_iter()
                .filter(|p| self.contains(*p))
                .collect();
            for parent in &parents {
                self.cells[Self::slot(*parent)].children.push(at);
            }

            let cell = &mut self.cells[idx];
            cell.parents = parents;
            cell.formula = Some(formula);
            cell.dirty = true;
        } else {
            let cell = &mut self.cells[idx];
            cell.formula = None;
            cell.value = text.to_string();
            cell.dirty = false;
        }

        if let Some(formula) = self.cells[idx].formula.as_ref() {
            tracing::debug!(
                cell = %at,
                text,
                tokens = formula.tokens().len(),
                failed = formula.is_failed(),
                "formula set"
            );
        } else {
            tracing::debug!(cell = %at, text, "literal set");
        }
        self.invalidate_dependents(at, idx);
        Ok(())
    }

    fn unlink_parents(&mut self, at: CellRef, idx: usize) {
        let old = std::mem::take(&mut self.cells[idx].parents);
        for parent in old {
            self.cells[Self::slot(parent)].children.retain(|c| *c != at);
        }
    }

    /// Mark every transitive dependent of `at` dirty.
    ///
    /// Each cell is visited at most once per pass, and the walk does not
    /// descend below a cell that was already dirty.
    fn invalidate_dependents(&mut self, at: CellRef, idx: usize) {
        let mut visited = HashSet::from([at]);
        let mut stack = self.cells[idx].children.clone();

        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            let cell = &mut self.cells[Self::slot(next)];
            if cell.dirty {
                continue;
            }
            tracing::trace!(cell = %next, "marked dirty");
            cell.dirty = true;
            stack.extend(cell.children.iter().copied());
        }
    }

    fn slot(at: CellRef) -> usize {
        at.col * SHEET_ROWS + at.row
    }

    fn value_at(&mut self, at: CellRef, idx: usize) -> String {
        if self.cells[idx].dirty {
            self.settle(at);
        }
        self.cells[idx].value.clone()
    }

    /// Recompute `root` and every dirty formula it transitively reads.
    ///
    /// Parents are visited depth-first with an explicit stack and each cell
    /// is evaluated after its parents, so evaluation itself only ever reads
    /// clean cells or cells still on the stack. Cells on the stack are in
    /// flight; reading one of them is a circular reference.
    fn settle(&mut self, root: CellRef) {
        // (cell, index of the next parent to visit)
        let mut stack = vec![(root, 0usize)];
        self.in_flight.insert(root);

        while let Some(top) = stack.last_mut() {
            let at = top.0;
            let next = self.cells[Self::slot(at)].parents.get(top.1).copied();
            if let Some(parent) = next {
                top.1 += 1;
                let cell = &self.cells[Self::slot(parent)];
                if cell.dirty && cell.formula.is_some() && !self.in_flight.contains(&parent) {
                    self.in_flight.insert(parent);
                    stack.push((parent, 0));
                }
                continue;
            }

            stack.pop();
            self.recompute(at);
            self.in_flight.remove(&at);
        }
    }

    fn recompute(&mut self, at: CellRef) {
        let idx = Self::slot(at);
        let cell = &mut self.cells[idx];
        let Some(formula) = cell.formula.take() else {
            cell.dirty = false;
            return;
        };

        let value = formula.evaluate(at, self);

        let cell = &mut self.cells[idx];
        cell.formula = Some(formula);
        cell.value = value;
        cell.dirty = false;
        cell.evaluations += 1;
        tracing::debug!(cell = %at, value = %cell.value, "recomputed");
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSource for Sheet {
    fn cell_value(&mut self, at: CellRef) -> std::result::Result<String, EvalError> {
        let idx = self
            .index(at)
            .ok_or_else(|| EvalError::UnknownRef(at.to_string()))?;
        if self.in_flight.contains(&at) {
            tracing::debug!(cell = %at, "circular reference");
            return Err(EvalError::CircularRef);
        }
        Ok(self.value_at(at, idx))
    }
}
