//! A1-style cell reference helpers.

use crate::common::{Error, Result};

/// Convert a 1-based column number to letters (1 -> "A", 27 -> "AA").
pub fn column_to_letters(col: u32) -> String {
    let mut letters = Vec::with_capacity(3);
    let mut col = col;

    while col > 0 {
        col -= 1;
        letters.push((col % 26) as u8 + b'A');
        col /= 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Build an A1 reference from 1-based row and column numbers.
pub fn coords_to_reference(row: u32, col: u32) -> String {
    let mut reference = column_to_letters(col);
    let mut buf = itoa::Buffer::new();
    reference.push_str(buf.format(row));
    reference
}

/// Split an A1 reference into 1-based `(column, row)` numbers.
pub fn reference_to_coords(reference: &str) -> Result<(u32, u32)> {
    let bytes = reference.as_bytes();
    let col_str_end = bytes
        .iter()
        .position(|b| b.is_ascii_digit())
        .ok_or_else(|| Error::InvalidFormat(format!("Invalid reference: {}", reference)))?;

    if col_str_end == 0 {
        return Err(Error::InvalidFormat(format!("Invalid reference: {}", reference)));
    }

    let mut col_num = 0u32;
    for &byte in &bytes[..col_str_end] {
        if !byte.is_ascii_alphabetic() {
            return Err(Error::InvalidFormat(format!(
                "Invalid column in reference: {}",
                reference
            )));
        }
        col_num = col_num * 26 + (byte.to_ascii_uppercase() - b'A' + 1) as u32;
    }

    let row_num: u32 = atoi_simd::parse(&bytes[col_str_end..]).map_err(|_| {
        Error::InvalidFormat(format!("Invalid row number in reference: {}", reference))
    })?;

    Ok((col_num, row_num))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(column_to_letters(0), "");
    }

    #[test]
    fn test_reference_parsing() {
        assert_eq!(reference_to_coords("A1").unwrap(), (1, 1));
        assert_eq!(reference_to_coords("ab12").unwrap(), (28, 12));
        assert!(reference_to_coords("12").is_err());
        assert!(reference_to_coords("A").is_err());
        assert!(reference_to_coords("A-1").is_err());
    }

    #[test]
    fn test_coords_to_reference() {
        assert_eq!(coords_to_reference(10, 3), "C10");
    }
}
