//! Expression evaluation against a grid of cells.
//!
//! The evaluator never touches cell storage directly; it asks a
//! [`CellSource`] for the current text of each referenced cell. Within one
//! formula the first failure aborts the walk and becomes the result, while
//! values flowing in from other cells are plain text, including error text.

use thiserror::Error;

use super::ast::{BinaryOp, Expr, expand_range};
use super::cell_ref::{CellRef, name_to_index, parse_range};
use super::format::{format_number, parse_number};
use crate::builtins;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Circular ref")]
    CircularRef,

    #[error("unknown ref {0}")]
    UnknownRef(String),

    #[error("unexpected range {0}")]
    UnexpectedRange(String),

    #[error("range too large: {0}")]
    RangeTooLarge(String),

    #[error("Invalid binary operation")]
    InvalidBinaryOperation,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Numeric overflow")]
    NumericOverflow,

    #[error("Expected number")]
    ExpectedNumber,

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{0} requires at least one argument")]
    NoArguments(&'static str),
}

/// Lookup service the evaluator pulls cell values from.
pub trait CellSource {
    /// Current (lazily computed) text of the cell at `at`.
    ///
    /// Returns `UnknownRef` when `at` is outside the grid and `CircularRef`
    /// when the cell is itself still being evaluated.
    fn cell_value(&mut self, at: CellRef) -> Result<String, EvalError>;
}

/// One function argument after range flattening.
enum Arg<'e> {
    Expr(&'e Expr),
    Cell(CellRef),
}

/// Walks an expression on behalf of the cell at `origin`.
pub struct Evaluator<'s, S: CellSource + ?Sized> {
    source: &'s mut S,
    origin: CellRef,
}

impl<'s, S: CellSource + ?Sized> Evaluator<'s, S> {
    pub fn new(source: &'s mut S, origin: CellRef) -> Self {
        Evaluator { source, origin }
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<String, EvalError> {
        match expr {
            Expr::Number(n) => Ok(format_number(*n)),
            Expr::String(s) => Ok(s.clone()),
            Expr::CellRef(name) => {
                let at = name_to_index(name).map_err(|_| EvalError::UnknownRef(name.clone()))?;
                self.cell(at, name)
            }
            Expr::CellRange(range) => Err(EvalError::UnexpectedRange(range.clone())),
            Expr::Binary { op, left, right } => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                let (Some(l), Some(r)) = (parse_number(&l), parse_number(&r)) else {
                    return Err(EvalError::InvalidBinaryOperation);
                };
                if *op == BinaryOp::Divide && r == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                let result = op.apply(l, r);
                if !result.is_finite() {
                    return Err(EvalError::NumericOverflow);
                }
                Ok(format_number(result))
            }
            Expr::Function { name, args } => self.call(name, args),
        }
    }

    fn cell(&mut self, at: CellRef, name: &str) -> Result<String, EvalError> {
        if at == self.origin {
            return Err(EvalError::CircularRef);
        }
        self.source.cell_value(at).map_err(|e| match e {
            EvalError::UnknownRef(_) => EvalError::UnknownRef(name.to_string()),
            other => other,
        })
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<String, EvalError> {
        let builtin =
            builtins::lookup(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

        let flat = flatten_args(args)?;
        let mut numbers = Vec::with_capacity(flat.len());
        for arg in flat {
            let text = match arg {
                Arg::Expr(expr) => self.eval(expr)?,
                Arg::Cell(at) => self.cell(at, &at.to_string())?,
            };
            numbers.push(parse_number(&text).ok_or(EvalError::ExpectedNumber)?);
        }

        let result = (builtin.apply)(&numbers)?;
        if !result.is_finite() {
            return Err(EvalError::NumericOverflow);
        }
        Ok(format_number(result))
    }
}

/// Replace every range argument with the cells it covers, in order.
fn flatten_args(args: &[Expr]) -> Result<Vec<Arg<'_>>, EvalError> {
    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Expr::CellRange(range) => {
                if parse_range(range).is_err() {
                    return Err(EvalError::UnknownRef(range.clone()));
                }
                let cells =
                    expand_range(range).ok_or_else(|| EvalError::RangeTooLarge(range.clone()))?;
                flat.extend(cells.into_iter().map(Arg::Cell));
            }
            other => flat.push(Arg::Expr(other)),
        }
    }
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Parser, tokenize};
    use std::collections::HashMap;

    /// Fixed-size grid of literal values.
    struct MapSource {
        cells: HashMap<CellRef, String>,
        size: usize,
        reads: usize,
    }

    impl MapSource {
        fn new(values: &[(&str, &str)]) -> Self {
            let cells = values
                .iter()
                .map(|(name, v)| (name_to_index(name).unwrap(), v.to_string()))
                .collect();
            MapSource { cells, size: 50, reads: 0 }
        }
    }

    impl CellSource for MapSource {
        fn cell_value(&mut self, at: CellRef) -> Result<String, EvalError> {
            if at.col >= self.size || at.row >= self.size {
                return Err(EvalError::UnknownRef(at.to_string()));
            }
            self.reads += 1;
            Ok(self.cells.get(&at).cloned().unwrap_or_default())
        }
    }

    fn eval_in(source: &mut MapSource, origin: &str, text: &str) -> Result<String, EvalError> {
        let tokens = tokenize(text).unwrap();
        let expr = Parser::new(&tokens).parse_formula().unwrap();
        Evaluator::new(source, name_to_index(origin).unwrap()).eval(&expr)
    }

    fn eval(values: &[(&str, &str)], text: &str) -> Result<String, EvalError> {
        eval_in(&mut MapSource::new(values), "Z50", text)
    }

    #[test]
    fn test_number_literals_are_reformatted() {
        assert_eq!(eval(&[], "=007"), Ok("7".into()));
        assert_eq!(eval(&[], "=1.50"), Ok("1.5".into()));
        assert_eq!(eval(&[], "=.5"), Ok("0.5".into()));
    }

    #[test]
    fn test_string_passes_through() {
        assert_eq!(eval(&[], "=\"hello\""), Ok("hello".into()));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval(&[], "=1+2*3"), Ok("7".into()));
        assert_eq!(eval(&[], "=8-4-2"), Ok("2".into()));
        assert_eq!(eval(&[], "=1/4"), Ok("0.25".into()));
        assert_eq!(eval(&[], "=0.1+0.2"), Ok("0.3".into()));
        assert_eq!(eval(&[], "=2-5"), Ok("-3".into()));
    }

    #[test]
    fn test_cell_refs() {
        let values = [("A1", "1"), ("B2", "2.5")];
        assert_eq!(eval(&values, "=A1+2"), Ok("3".into()));
        assert_eq!(eval(&values, "=a1*b2"), Ok("2.5".into()));
        assert_eq!(eval(&values, "=B2"), Ok("2.5".into()));
    }

    #[test]
    fn test_self_reference() {
        let mut source = MapSource::new(&[("A1", "1"), ("A2", "2")]);
        assert_eq!(eval_in(&mut source, "A1", "=A1"), Err(EvalError::CircularRef));
        assert_eq!(eval_in(&mut source, "A1", "=A1+1"), Err(EvalError::CircularRef));
        assert_eq!(eval_in(&mut source, "A3", "=SUM(A1:A5)"), Err(EvalError::CircularRef));
    }

    #[test]
    fn test_unknown_refs() {
        assert_eq!(eval(&[], "=A0"), Err(EvalError::UnknownRef("A0".into())));
        assert_eq!(eval(&[], "=a99"), Err(EvalError::UnknownRef("a99".into())));
        assert_eq!(eval(&[], "=AZ1"), Err(EvalError::UnknownRef("AZ1".into())));
    }

    #[test]
    fn test_bare_range_is_an_error() {
        assert_eq!(eval(&[], "=A1:B2"), Err(EvalError::UnexpectedRange("A1:B2".into())));
    }

    #[test]
    fn test_invalid_binary_operation() {
        let values = [("A1", "abc"), ("A2", "#ERR: Circular ref")];
        assert_eq!(eval(&values, "=A1+1"), Err(EvalError::InvalidBinaryOperation));
        assert_eq!(eval(&values, "=A2*2"), Err(EvalError::InvalidBinaryOperation));
        assert_eq!(eval(&values, "=\"1\"+\"2\""), Ok("3".into()));
        assert_eq!(eval(&[], "=C3+1"), Err(EvalError::InvalidBinaryOperation));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval(&[], "=1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval(&[("A1", "0")], "=5/A1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_aggregates_over_ranges() {
        let values = [("A1", "1"), ("A2", "2"), ("A3", "3")];
        assert_eq!(eval(&values, "=SUM(A1:A3)"), Ok("6".into()));
        assert_eq!(eval(&values, "=AVG(A1:A3)"), Ok("2".into()));
        assert_eq!(eval(&values, "=MIN(A1:A3)"), Ok("1".into()));
        assert_eq!(eval(&values, "=MAX(A1:A3)"), Ok("3".into()));
        assert_eq!(eval(&values, "=COUNT(A1:A3)"), Ok("3".into()));
        assert_eq!(eval(&values, "=SUM(A3:A1)"), Ok("6".into()));
        assert_eq!(eval(&values, "=SUM(A1:A3, 10, A1*2)"), Ok("18".into()));
        assert_eq!(eval(&values, "=sum(A1:A2)"), Ok("3".into()));
    }

    #[test]
    fn test_count_rejects_non_numeric_cells() {
        let values = [("A1", "1"), ("A2", "two"), ("A3", "3")];
        assert_eq!(eval(&values, "=COUNT(A1:A3)"), Err(EvalError::ExpectedNumber));
        assert_eq!(eval(&values, "=SUM(A1:A3)"), Err(EvalError::ExpectedNumber));
    }

    #[test]
    fn test_function_edge_cases() {
        assert_eq!(eval(&[], "=SUM()"), Ok("0".into()));
        assert_eq!(eval(&[], "=COUNT()"), Ok("0".into()));
        assert_eq!(eval(&[], "=AVG()"), Err(EvalError::NoArguments("AVG")));
        assert_eq!(eval(&[], "=MAX()"), Err(EvalError::NoArguments("MAX")));
        assert_eq!(eval(&[], "=FOO(1)"), Err(EvalError::UnknownFunction("FOO".into())));
        assert_eq!(eval(&[], "=SUM(A1:A0)"), Err(EvalError::UnknownRef("A1:A0".into())));
        assert_eq!(
            eval(&[], "=SUM(A1:ZZ9999)"),
            Err(EvalError::RangeTooLarge("A1:ZZ9999".into()))
        );
        assert_eq!(eval(&[], "=MAX(MIN(4,2),3)+1"), Ok("4".into()));
    }

    #[test]
    fn test_range_reads_every_cell() {
        let mut source = MapSource::new(&[("A1", "1"), ("B3", "2")]);
        assert_eq!(eval_in(&mut source, "Z50", "=COUNT(A1:B3)"), Err(EvalError::ExpectedNumber));
        // stops at the first empty cell (A2)
        assert_eq!(source.reads, 2);
    }

    #[test]
    fn test_out_of_grid_range_cell() {
        let mut source = MapSource::new(&[]);
        source.size = 2;
        let err = eval_in(&mut source, "A1", "=SUM(B1:C1)").unwrap_err();
        assert_eq!(err, EvalError::ExpectedNumber);
        let err = eval_in(&mut source, "A1", "=SUM(C1:C2)").unwrap_err();
        assert_eq!(err, EvalError::UnknownRef("C1".into()));
    }
}
