//! Recursive-descent formula parser.
//!
//! ```text
//! formula    := '=' expression EOF
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := NUMBER | STRING | CELL_REF | CELL_RANGE
//!             | FUNC '(' [ expression (',' expression)* ] ')'
//! ```
//!
//! There is no grouping syntax: `(` is only valid right after a function name.

use thiserror::Error;

use super::ast::{BinaryOp, Expr};
use super::token::{Token, TokenizeError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("Formula must start with '='")]
    MissingEquals,

    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("parenthesized grouping is not supported")]
    Grouping,

    #[error("expected '(' after {0}")]
    ExpectedOpenParen(String),

    #[error("expected ')' to close {0}")]
    ExpectedCloseParen(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Token buffer plus cursor.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, current: 0 }
    }

    /// Parse a whole formula, including the leading `=`.
    pub fn parse_formula(mut self) -> Result<Expr, ParseError> {
        if self.peek() != Some(&Token::Equals) {
            return Err(ParseError::MissingEquals);
        }
        self.current = 1;

        let root = self.parse_expression()?;
        match self.peek() {
            None => Ok(root),
            Some(tok) => Err(ParseError::UnexpectedToken(tok.text())),
        }
    }

    // lowest precedence: + -
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            node = Expr::binary(op, node, right);
        }
        Ok(node)
    }

    // * /
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            node = Expr::binary(op, node, right);
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let tok = self.advance().ok_or(ParseError::UnexpectedEnd)?.clone();
        match tok {
            Token::Number(text) => text
                .parse::<f64>()
                .map(Expr::Number)
                .map_err(|_| ParseError::InvalidNumber(text)),
            Token::Str(s) => Ok(Expr::String(s)),
            Token::CellRef(name) => Ok(Expr::CellRef(name)),
            Token::CellRange(range) => Ok(Expr::CellRange(range)),
            Token::Func(name) => self.parse_call(name),
            Token::LParen => Err(ParseError::Grouping),
            other => Err(ParseError::UnexpectedToken(other.text())),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::LParen) => {}
            Some(_) | None => return Err(ParseError::ExpectedOpenParen(name)),
        }

        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.advance();
            return Ok(Expr::Function { name, args });
        }

        loop {
            args.push(self.parse_expression()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => break,
                Some(_) | None => return Err(ParseError::ExpectedCloseParen(name)),
            }
        }
        Ok(Expr::Function { name, args })
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.current)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.current)?;
        self.current += 1;
        Some(tok)
    }
}
