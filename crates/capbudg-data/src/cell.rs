//! Typed sheet cells.
//!
//! Every cell is decided once, at load time, into one of three shapes. Text
//! that reads as a plain decimal number (optionally with a trailing `%`) is
//! stored as a number so later stages never re-parse strings.

use std::fmt;
use std::sync::OnceLock;

use calamine::Data;
use regex::Regex;

/// A single sheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value
    Empty,
    /// Non-numeric text, stored as read
    Text(String),
    /// Finite numeric value
    Number(f64),
}

/// Grid of cells, row-major, as read from one sheet
pub type Grid = Vec<Vec<Cell>>;

impl Cell {
    /// Convert a calamine cell
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::from_text(s),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) if f.is_finite() => Cell::Number(*f),
            Data::Float(_) => Cell::Empty,
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Text(format!("{}", dt)),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }

    /// Classify a text value, coercing strict decimals and percentages
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Cell::Empty;
        }
        match parse_number(text) {
            Some(n) => Cell::Number(n),
            None => Cell::Text(text.to_string()),
        }
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text value, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => {
                // Whole numbers print without a trailing ".0"
                if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

/// Parse a strict decimal number, allowing surrounding whitespace and a
/// trailing percent sign (`"12.5%"` is `0.125`).
///
/// Rejects `inf`, `nan`, thousands separators, and anything else that is not
/// a plain decimal literal.
pub fn parse_number(text: &str) -> Option<f64> {
    static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();
    let decimal_re = DECIMAL_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap()
    });

    let trimmed = text.trim();
    let (literal, scale) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), 100.0),
        None => (trimmed, 1.0),
    };

    if !decimal_re.is_match(literal) {
        return None;
    }

    literal
        .parse::<f64>()
        .ok()
        .map(|n| n / scale)
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_decimals() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("+.25"), Some(0.25));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("  7  "), Some(7.0));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_number("50%"), Some(0.5));
        assert_eq!(parse_number("12.5 %"), Some(0.125));
        assert_eq!(parse_number("%"), None);
    }

    #[test]
    fn test_parse_rejects_non_decimals() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("Year 1"), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_from_data() {
        assert_eq!(Cell::from_data(&Data::Empty), Cell::Empty);
        assert_eq!(Cell::from_data(&Data::Int(5)), Cell::Number(5.0));
        assert_eq!(Cell::from_data(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(
            Cell::from_data(&Data::String("10%".to_string())),
            Cell::Number(0.1)
        );
        assert_eq!(
            Cell::from_data(&Data::String("Revenue".to_string())),
            Cell::Text("Revenue".to_string())
        );
        assert_eq!(Cell::from_data(&Data::String(String::new())), Cell::Empty);
        assert_eq!(
            Cell::from_data(&Data::Bool(true)),
            Cell::Text("true".to_string())
        );
    }

    #[test]
    fn test_is_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".to_string()).is_blank());
        assert!(!Cell::Text("x".to_string()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Number(10.0).to_string(), "10");
        assert_eq!(Cell::Number(3.25).to_string(), "3.25");
        assert_eq!(Cell::Text("Label".to_string()).to_string(), "Label");
        assert_eq!(Cell::Empty.to_string(), "");
    }
}
