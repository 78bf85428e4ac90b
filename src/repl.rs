//! Line-oriented command interface over a [`Sheet`].

use std::io::{self, BufRead, Write};

use canno_core::{Sheet, index_to_name};
use canno_engine::builtins::BUILTINS;
use canno_engine::engine::is_error;
use tracing::debug;

use crate::error::CommandError;

const HELP: &str = "\
Commands available for Canno:
help          -- Shows this helpful message
set REF VALUE -- Sets the value for the cell at REF (e.g., A1)
get REF       -- Gets the value for the cell at REF (e.g., B2)
formula REF   -- Shows the formula stored at REF, if any
dims          -- Shows the sheet dimensions
show          -- Lists every non-empty cell
quit          -- Quits the Canno program";

/// Cell used by [`evaluate_expression`]; far from the usual A1 corner.
const SCRATCH_CELL: &str = "AX50";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Set { name: String, value: String },
    Get { name: String },
    Formula { name: String },
    Dims,
    Show,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

fn split_word(s: &str) -> (&str, &str) {
    s.split_once(char::is_whitespace).unwrap_or((s, ""))
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// For `set`, everything after the reference and a single separator is the
/// value, so formulas may contain spaces.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = split_word(line);
    let single_ref = |usage: &'static str| -> Result<String, CommandError> {
        match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [name] => Ok(name.to_string()),
            _ => Err(CommandError::Usage(usage)),
        }
    };

    let command = match word {
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "dims" => Command::Dims,
        "show" => Command::Show,
        "get" => Command::Get {
            name: single_ref("get REF")?,
        },
        "formula" => Command::Formula {
            name: single_ref("formula REF")?,
        },
        "set" => {
            let (name, value) = split_word(rest.trim_start());
            if name.is_empty() {
                return Err(CommandError::Usage("set REF VALUE"));
            }
            Command::Set {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

pub struct Session {
    sheet: Sheet,
    echo_formulas: bool,
}

impl Session {
    pub fn new(echo_formulas: bool) -> Self {
        Session {
            sheet: Sheet::new(),
            echo_formulas,
        }
    }

    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> io::Result<Outcome> {
        debug!(?command, "executing");
        match command {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help => {
                writeln!(out, "{HELP}")?;
                writeln!(out, "Functions:")?;
                for builtin in BUILTINS {
                    writeln!(out, "{:<13} -- {}", builtin.name, builtin.description)?;
                }
            }
            Command::Dims => {
                let (cols, rows) = self.sheet.dimensions();
                writeln!(out, "{cols} x {rows}")?;
            }
            Command::Set { name, value } => match self.sheet.set_cell_by_name(name, value) {
                Ok(()) => writeln!(out, "Set {name} = \"{value}\"")?,
                Err(err) => writeln!(out, "Failed to set {name}: {err}")?,
            },
            Command::Get { name } => match self.sheet.get_cell_value_by_name(name) {
                Some(value) => {
                    write!(out, "get {name} = \"{value}\"")?;
                    if self.echo_formulas
                        && let Some(formula) = self.sheet.get_cell_formula_by_name(name)
                    {
                        write!(out, " ({formula})")?;
                    }
                    writeln!(out)?;
                }
                None => writeln!(out, "Failed to get {name}")?,
            },
            Command::Formula { name } => {
                if self.sheet.locate(name).is_err() {
                    writeln!(out, "Failed to get {name}")?;
                } else {
                    match self.sheet.get_cell_formula_by_name(name) {
                        Some(formula) => writeln!(out, "{name}: {formula}")?,
                        None => writeln!(out, "{name} holds no formula")?,
                    }
                }
            }
            Command::Show => self.show(out)?,
        }
        Ok(Outcome::Continue)
    }

    fn show<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let occupied: Vec<_> = self.sheet.cells().map(|(at, _)| at).collect();
        for at in occupied {
            let name = index_to_name(at.col, at.row);
            let value = self.sheet.get_value(at).unwrap_or_default();
            match self.sheet.get_formula(at) {
                Some(formula) => writeln!(out, "{name} = \"{value}\" ({formula})")?,
                None => writeln!(out, "{name} = \"{value}\"")?,
            }
        }
        Ok(())
    }

    /// Parse and run one line, reporting command errors on `out`.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Outcome> {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(&command, out),
            Ok(None) => Ok(Outcome::Continue),
            Err(err) => {
                writeln!(out, "{err}")?;
                Ok(Outcome::Continue)
            }
        }
    }
}

/// Interactive loop: prompt, read a line, run it, until `quit` or EOF.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    out: &mut W,
    prompt: &str,
) -> io::Result<()> {
    writeln!(out, "Welcome to Canno.")?;
    let mut line = String::new();
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if session.run_line(&line, out)? == Outcome::Quit {
            break;
        }
    }
    writeln!(out, "Exiting Canno")
}

/// Evaluate a single formula on a fresh sheet. A missing leading `=` is added.
pub fn evaluate_expression(expr: &str) -> canno_core::Result<String> {
    let expr = expr.trim();
    let formula = if expr.starts_with('=') {
        expr.to_string()
    } else {
        format!("={expr}")
    };

    let mut sheet = Sheet::new();
    sheet.set_cell_by_name(SCRATCH_CELL, &formula)?;
    Ok(sheet
        .get_cell_value_by_name(SCRATCH_CELL)
        .unwrap_or_default())
}

/// True when a value printed by command mode should make the process fail.
pub fn is_failure(value: &str) -> bool {
    is_error(value)
}
