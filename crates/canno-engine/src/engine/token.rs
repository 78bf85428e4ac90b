//! Formula tokenizer.
//!
//! Turns formula text such as `=SUM(A1:A3)*2` into a flat token list.
//! Whitespace between tokens is skipped; any character that cannot start a
//! token is reported as an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `12`, `12.5`, `.5` (kept as written)
    Number(String),
    /// `"text"` without the quotes
    Str(String),
    Equals,
    Plus,
    Minus,
    Star,
    Slash,
    Comma,
    LParen,
    RParen,
    /// `A1`, `aa10`
    CellRef(String),
    /// `A1:B3`
    CellRange(String),
    /// Letters not followed by digits, e.g. `SUM`
    Func(String),
}

impl Token {
    /// Source text of the token, used in error messages.
    pub fn text(&self) -> String {
        match self {
            Token::Number(s) | Token::CellRef(s) | Token::CellRange(s) | Token::Func(s) => {
                s.clone()
            }
            Token::Str(s) => format!("\"{}\"", s),
            Token::Equals => "=".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Comma => ",".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizeError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if let Some(tok) = punctuation(c) {
            tokens.push(tok);
            chars.next();
            continue;
        }
        match c {
            c if c.is_ascii_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(ch) => s.push(ch),
                        None => return Err(TokenizeError::UnterminatedString),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '0'..='9' | '.' => {
                let mut num = String::new();
                let mut seen_dot = false;
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || (d == '.' && !seen_dot) {
                        seen_dot |= d == '.';
                        num.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(num));
            }
            c if c.is_ascii_alphabetic() => {
                let mut ident = take_while(&mut chars, |ch| ch.is_ascii_alphabetic());

                if !chars.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                    tokens.push(Token::Func(ident));
                    continue;
                }
                ident.push_str(&take_while(&mut chars, |ch| ch.is_ascii_digit()));

                if chars.peek() == Some(&':') {
                    chars.next();
                    ident.push(':');
                    ident.push_str(&take_while(&mut chars, |ch| ch.is_ascii_alphanumeric()));
                    tokens.push(Token::CellRange(ident));
                } else {
                    tokens.push(Token::CellRef(ident));
                }
            }
            other => return Err(TokenizeError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

fn punctuation(c: char) -> Option<Token> {
    let tok = match c {
        '=' => Token::Equals,
        '+' => Token::Plus,
        '-' => Token::Minus,
        '*' => Token::Star,
        '/' => Token::Slash,
        ',' => Token::Comma,
        '(' => Token::LParen,
        ')' => Token::RParen,
        _ => return None,
    };
    Some(tok)
}

fn take_while(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut out = String::new();
    while let Some(&ch) = chars.peek() {
        if !pred(ch) {
            break;
        }
        out.push(ch);
        chars.next();
    }
    out
}
