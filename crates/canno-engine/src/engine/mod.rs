//! Formula engine API.
//!
//! - [`CellRef`], [`name_to_index`], [`index_to_name`] - A1 notation ↔ column/row indices
//! - [`tokenize`], [`Parser`] - formula text → [`Expr`] tree
//! - [`Evaluator`], [`CellSource`] - evaluate a tree against a grid
//! - [`Formula`] - text, tokens and tree for one cell
//! - [`extract_dependencies`] - cells a tree reads
//! - [`format_number`] - canonical numeric text

mod ast;
mod cell_ref;
mod deps;
mod eval;
mod format;
mod formula;
mod parser;
mod token;

pub use ast::{BinaryOp, Expr, MAX_RANGE_CELLS, expand_range};
pub use cell_ref::{AddressError, CellRef, index_to_name, name_to_index, parse_range};
pub use deps::extract_dependencies;
pub use eval::{CellSource, EvalError, Evaluator};
pub use format::{ERROR_MARKER, format_error, format_number, is_error, parse_number};
pub use formula::{Formula, FormulaError};
pub use parser::{ParseError, Parser};
pub use token::{Token, TokenizeError, tokenize};
