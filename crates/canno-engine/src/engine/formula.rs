//! Compiled form of one cell's formula text.

use thiserror::Error;

use super::ast::Expr;
use super::cell_ref::CellRef;
use super::deps::extract_dependencies;
use super::eval::{CellSource, Evaluator};
use super::format::format_error;
use super::parser::{ParseError, Parser};
use super::token::{Token, tokenize};

/// Misuse of [`Formula::new`]; never stored as a cell value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("formula must start with '=': {0:?}")]
    MissingEquals(String),
}

#[derive(Debug, Clone)]
pub struct Formula {
    text: String,
    tokens: Vec<Token>,
    root: Result<Expr, ParseError>,
}

impl Formula {
    /// Tokenize and parse `text`.
    ///
    /// Text without a leading `=` is rejected outright. Any other problem
    /// leaves the formula in a failed state whose message becomes its value.
    pub fn new(text: &str) -> Result<Formula, FormulaError> {
        if !text.starts_with('=') {
            tracing::warn!(text, "formula constructed without leading '='");
            return Err(FormulaError::MissingEquals(text.to_string()));
        }

        let (tokens, root) = match tokenize(text) {
            Ok(tokens) => {
                let root = Parser::new(&tokens).parse_formula();
                (tokens, root)
            }
            Err(e) => (Vec::new(), Err(ParseError::from(e))),
        };
        if let Err(e) = &root {
            tracing::debug!(text, error = %e, "formula failed to parse");
        }

        Ok(Formula {
            text: text.to_string(),
            tokens,
            root,
        })
    }

    /// Original text, including the leading `=`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn root(&self) -> Option<&Expr> {
        self.root.as_ref().ok()
    }

    pub fn is_failed(&self) -> bool {
        self.root.is_err()
    }

    /// Cells this formula reads, ranges flattened, duplicates kept.
    pub fn dependencies(&self) -> Vec<CellRef> {
        self.root().map(extract_dependencies).unwrap_or_default()
    }

    /// Evaluate on behalf of the cell at `origin`. Errors come back as
    /// `#ERR: ` text.
    pub fn evaluate<S: CellSource + ?Sized>(&self, origin: CellRef, source: &mut S) -> String {
        let root = match &self.root {
            Ok(root) => root,
            Err(e) => return format_error(e),
        };
        Evaluator::new(source, origin)
            .eval(root)
            .unwrap_or_else(format_error)
    }
}
