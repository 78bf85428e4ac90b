//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVG`); lookup ignores case.
//! - Every built-in receives its arguments already flattened (ranges expanded)
//!   and converted to numbers.
//! - To add a built-in, append an entry to `BUILTINS`.

use crate::engine::EvalError;

pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    pub apply: fn(&[f64]) -> Result<f64, EvalError>,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of the arguments",
        apply: sum,
    },
    Builtin {
        name: "AVG",
        description: "Arithmetic mean of the arguments",
        apply: avg,
    },
    Builtin {
        name: "MIN",
        description: "Smallest argument",
        apply: min,
    },
    Builtin {
        name: "MAX",
        description: "Largest argument",
        apply: max,
    },
    Builtin {
        name: "COUNT",
        description: "Number of arguments after range expansion",
        apply: count,
    },
];

/// Find a built-in by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

fn sum(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args.iter().sum())
}

fn avg(args: &[f64]) -> Result<f64, EvalError> {
    if args.is_empty() {
        return Err(EvalError::NoArguments("AVG"));
    }
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}

fn min(args: &[f64]) -> Result<f64, EvalError> {
    args.iter()
        .copied()
        .reduce(f64::min)
        .ok_or(EvalError::NoArguments("MIN"))
}

fn max(args: &[f64]) -> Result<f64, EvalError> {
    args.iter()
        .copied()
        .reduce(f64::max)
        .ok_or(EvalError::NoArguments("MAX"))
}

fn count(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup("sum").map(|b| b.name), Some("SUM"));
        assert_eq!(lookup("Avg").map(|b| b.name), Some("AVG"));
        assert!(lookup("MEDIAN").is_none());
    }

    #[test]
    fn test_aggregates() {
        let xs = [1.0, 2.0, 3.0];
        assert_eq!(sum(&xs), Ok(6.0));
        assert_eq!(avg(&xs), Ok(2.0));
        assert_eq!(min(&xs), Ok(1.0));
        assert_eq!(max(&xs), Ok(3.0));
        assert_eq!(count(&xs), Ok(3.0));
    }

    #[test]
    fn test_empty_arguments() {
        assert_eq!(sum(&[]), Ok(0.0));
        assert_eq!(count(&[]), Ok(0.0));
        assert_eq!(avg(&[]), Err(EvalError::NoArguments("AVG")));
        assert_eq!(min(&[]), Err(EvalError::NoArguments("MIN")));
        assert_eq!(max(&[]), Err(EvalError::NoArguments("MAX")));
    }

    #[test]
    fn test_every_builtin_is_documented() {
        for b in BUILTINS {
            assert!(!b.description.is_empty(), "{} lacks a description", b.name);
        }
    }
}
