//! Common types for spreadsheet operations.

use std::fmt;

/// Types of data that can be stored in a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// String value
    String(String),
    /// Error value (e.g. `#DIV/0!`)
    Error(String),
}

impl CellValue {
    /// Whether the cell carries no usable value.
    ///
    /// Empty cells and non-finite floats (the result of failed numeric
    /// coercion) are missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Float(f) => !f.is_finite(),
            _ => false,
        }
    }

    /// Whether the cell holds a native number (booleans included).
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_) | CellValue::Bool(_))
    }

    /// Numeric view of the cell.
    ///
    /// Numbers convert directly, booleans become 1/0 and strings are parsed
    /// after trimming. Anything else, including non-finite results, yields
    /// `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Int(i) => *i as f64,
            CellValue::Float(f) => *f,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            },
            CellValue::String(s) => parse_number(s)?,
            CellValue::Empty | CellValue::Error(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Text view of the cell, if it holds a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a numeric cell, keeping integral values as `Int`.
    pub fn number(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            CellValue::Int(value as i64)
        } else {
            CellValue::Float(value)
        }
    }
}

/// Parse a trimmed string as a finite number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(i as f64);
    }
    fast_float2::parse::<f64, _>(trimmed)
        .ok()
        .filter(|f| f.is_finite())
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Int(i) => {
                let mut buf = itoa::Buffer::new();
                f.write_str(buf.format(*i))
            },
            CellValue::Float(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    let mut buf = itoa::Buffer::new();
                    f.write_str(buf.format(*v as i64))
                } else {
                    write!(f, "{}", v)
                }
            },
            CellValue::String(s) => f.write_str(s),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CellValue::Int(4).as_f64(), Some(4.0));
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::from(" 3.5 ").as_f64(), Some(3.5));
        assert_eq!(CellValue::from("yes").as_f64(), None);
        assert_eq!(CellValue::from("inf").as_f64(), None);
        assert_eq!(CellValue::Empty.as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_missing() {
        assert!(CellValue::Empty.is_missing());
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert!(!CellValue::from("").is_missing());
        assert!(!CellValue::Int(0).is_missing());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Float(4.0).to_string(), "4");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Int(-7).to_string(), "-7");
        assert_eq!(CellValue::Bool(false).to_string(), "FALSE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_number_constructor() {
        assert_eq!(CellValue::number(3.0), CellValue::Int(3));
        assert_eq!(CellValue::number(3.25), CellValue::Float(3.25));
    }
}
