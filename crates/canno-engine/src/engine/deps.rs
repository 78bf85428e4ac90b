//! Dependency extraction from parsed formulas.
//!
//! Walks an expression tree and lists every cell it reads. Ranges are
//! expanded exactly as the evaluator expands them, so the dependency list
//! and the cells actually read during evaluation always agree. Repeated
//! references are kept.

use super::ast::{Expr, expand_range};
use super::cell_ref::{CellRef, name_to_index};

/// Collect every cell referenced by `expr`, in evaluation order.
///
/// Malformed names and oversized ranges are skipped; they can only ever
/// evaluate to an error, never to a read.
pub fn extract_dependencies(expr: &Expr) -> Vec<CellRef> {
    let mut deps = Vec::new();
    collect(expr, &mut deps);
    deps
}

fn collect(expr: &Expr, deps: &mut Vec<CellRef>) {
    match expr {
        Expr::Number(_) | Expr::String(_) => {}
        Expr::CellRef(name) => {
            if let Ok(at) = name_to_index(name) {
                deps.push(at);
            }
        }
        Expr::CellRange(range) => {
            if let Some(cells) = expand_range(range) {
                deps.extend(cells);
            }
        }
        Expr::Function { args, .. } => {
            for arg in args {
                collect(arg, deps);
            }
        }
        Expr::Binary { left, right, .. } => {
            collect(left, deps);
            collect(right, deps);
        }
    }
}
