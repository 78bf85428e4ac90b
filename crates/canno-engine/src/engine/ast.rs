//! Expression tree produced by the parser.

use std::fmt;

use super::cell_ref::{CellRef, parse_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::Divide => l / r,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }
}

/// A formula expression. Children are owned; nothing is shared.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    String(String),
    /// Cell name as written, resolved against the sheet at evaluation time.
    CellRef(String),
    /// Range text such as `A1:B3`; only meaningful as a function argument.
    CellRange(String),
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Upper bound on the number of cells a single range may expand to.
pub const MAX_RANGE_CELLS: usize = 10_000;

/// Expand a range into the cells it covers: columns in the outer loop,
/// rows in the inner loop, both ends inclusive. Reversed corners are
/// normalised. Returns `None` for malformed or oversized ranges.
pub fn expand_range(range: &str) -> Option<Vec<CellRef>> {
    let (start, end) = parse_range(range).ok()?;
    let (c0, c1) = (start.col.min(end.col), start.col.max(end.col));
    let (r0, r1) = (start.row.min(end.row), start.row.max(end.row));

    let count = (c1 - c0 + 1).checked_mul(r1 - r0 + 1)?;
    if count > MAX_RANGE_CELLS {
        return None;
    }

    let mut cells = Vec::with_capacity(count);
    for col in c0..=c1 {
        for row in r0..=r1 {
            cells.push(CellRef::new(col, row));
        }
    }
    Some(cells)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::String(s) => write!(f, "\"{}\"", s),
            Expr::CellRef(name) | Expr::CellRange(name) => write!(f, "{}", name),
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            // No grouping syntax exists, so the tree is shown fully bracketed.
            Expr::Binary { op, left, right } => {
                write!(f, "[{} {} {}]", left, op.symbol(), right)
            }
        }
    }
}
