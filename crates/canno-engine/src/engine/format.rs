//! Canonical text rendering for numbers and formula errors.

/// Prefix carried by every formula error value.
pub const ERROR_MARKER: &str = "#ERR: ";

/// Format a number for display.
///
/// Fixed ten decimals, then trailing zeros and a trailing point are dropped,
/// so `1.5` renders as `1.5` and `2.0` as `2`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "#NAN!".to_string();
    }
    if n.is_infinite() {
        return "#INF!".to_string();
    }

    let mut s = format!("{:.10}", n);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Parse cell text as a number. Only finite values count.
pub fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render an error message as a cell value.
pub fn format_error(message: impl std::fmt::Display) -> String {
    format!("{}{}", ERROR_MARKER, message)
}

/// Whether a cell value carries the error marker.
pub fn is_error(value: &str) -> bool {
    value.starts_with(ERROR_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_trims() {
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_format_number_hides_float_noise() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
    }

    #[test]
    fn test_format_number_negative_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-1e-12), "0");
    }

    #[test]
    fn test_format_number_non_finite() {
        assert_eq!(format_number(f64::NAN), "#NAN!");
        assert_eq!(format_number(f64::INFINITY), "#INF!");
        assert_eq!(format_number(f64::NEG_INFINITY), "#INF!");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3"), Some(3.0));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("#ERR: Circular ref"), None);
    }

    #[test]
    fn test_error_marker() {
        let e = format_error("Expected number");
        assert_eq!(e, "#ERR: Expected number");
        assert!(is_error(&e));
        assert!(!is_error("42"));
    }
}
