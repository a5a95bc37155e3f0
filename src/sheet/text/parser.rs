//! Streaming parser for delimited text formats

use std::io::Read;

use super::workbook::TextConfig;
use crate::common::Result;
use crate::sheet::CellValue;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Streaming parser for delimited text formats
pub struct TextParser<R: Read> {
    reader: R,
    config: TextConfig,
    buffer: Vec<u8>,
    buffer_pos: usize,
    buffer_len: usize,
    at_start: bool,
    eof: bool,
}

impl<R: Read> TextParser<R> {
    /// Create a new text parser
    pub fn new(reader: R, config: TextConfig) -> Self {
        let buffer_size = config.buffer_size.max(16);
        TextParser {
            reader,
            config,
            buffer: vec![0; buffer_size],
            buffer_pos: 0,
            buffer_len: 0,
            at_start: true,
            eof: false,
        }
    }

    fn fill(&mut self) -> Result<bool> {
        if self.buffer_pos < self.buffer_len {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }
        self.buffer_len = self.reader.read(&mut self.buffer)?;
        self.buffer_pos = 0;
        if self.buffer_len == 0 {
            self.eof = true;
        }
        Ok(self.buffer_len > 0)
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        let byte = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Ok(Some(byte))
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.buffer[self.buffer_pos]))
    }

    fn skip_bom(&mut self) -> Result<()> {
        self.at_start = false;
        if self.fill()? && self.buffer[self.buffer_pos..self.buffer_len].starts_with(&UTF8_BOM) {
            self.buffer_pos += UTF8_BOM.len();
        }
        Ok(())
    }

    /// Parse the next row from the input, `None` at end of input
    pub fn parse_row(&mut self) -> Result<Option<Vec<CellValue>>> {
        if self.at_start {
            self.skip_bom()?;
        }

        let mut fields = Vec::new();
        let mut current_field = Vec::new();
        let mut in_quotes = false;
        let mut saw_any = false;

        loop {
            let Some(byte) = self.next_byte()? else {
                if saw_any {
                    self.finish_field(&mut current_field, &mut fields);
                    return Ok(Some(fields));
                }
                return Ok(None);
            };
            saw_any = true;

            match byte {
                b'\n' if !in_quotes => {
                    self.finish_field(&mut current_field, &mut fields);
                    return Ok(Some(fields));
                },
                b'\r' if !in_quotes => {
                    // CR or CRLF ends the row
                    if self.peek_byte()? == Some(b'\n') {
                        self.buffer_pos += 1;
                    }
                    self.finish_field(&mut current_field, &mut fields);
                    return Ok(Some(fields));
                },
                quote if quote == self.config.quote => {
                    if in_quotes {
                        if self.peek_byte()? == Some(self.config.quote) {
                            // Escaped quote (doubled quote)
                            current_field.push(self.config.quote);
                            self.buffer_pos += 1;
                        } else {
                            in_quotes = false;
                        }
                    } else {
                        in_quotes = true;
                    }
                },
                delim if delim == self.config.delimiter && !in_quotes => {
                    self.finish_field(&mut current_field, &mut fields);
                },
                _ => current_field.push(byte),
            }
        }
    }

    /// Finish parsing a field and add it to the fields vector
    fn finish_field(&self, current_field: &mut Vec<u8>, fields: &mut Vec<CellValue>) {
        let field_bytes = std::mem::take(current_field);
        let mut field_str = match String::from_utf8(field_bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        if self.config.trim_whitespace {
            let trimmed = field_str.trim();
            if trimmed.len() != field_str.len() {
                field_str = trimmed.to_string();
            }
        }

        fields.push(infer_value(field_str));
    }
}

/// Type a raw field. Words such as `yes` stay strings.
fn infer_value(field: String) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(int_val) = field.parse::<i64>() {
        return CellValue::Int(int_val);
    }
    if looks_numeric(&field)
        && let Ok(float_val) = fast_float2::parse::<f64, _>(&field)
    {
        return CellValue::Float(float_val);
    }
    CellValue::String(field)
}

// fast_float2 accepts "inf"/"nan"; those must stay text here
fn looks_numeric(field: &str) -> bool {
    field
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &str, config: TextConfig) -> Vec<Vec<CellValue>> {
        let mut parser = TextParser::new(input.as_bytes(), config);
        let mut rows = Vec::new();
        while let Some(row) = parser.parse_row().unwrap() {
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_simple_csv_parsing() {
        let rows = parse_all("name,age,city\nJohn,25,New York\nJane,30.5,London", TextConfig::csv());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], CellValue::String("name".to_string()));
        assert_eq!(rows[1][1], CellValue::Int(25));
        assert_eq!(rows[2][1], CellValue::Float(30.5));
        assert_eq!(rows[2][2], CellValue::String("London".to_string()));
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_all(
            "\"Hello, World\",\"Value with \"\"quotes\"\"\",\"multi\nline\"",
            TextConfig::csv(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], CellValue::from("Hello, World"));
        assert_eq!(rows[0][1], CellValue::from("Value with \"quotes\""));
        assert_eq!(rows[0][2], CellValue::from("multi\nline"));
    }

    #[test]
    fn test_quotes_across_buffer_boundary() {
        let config = TextConfig {
            buffer_size: 16,
            ..TextConfig::csv()
        };
        let rows = parse_all("\"aaaaaaaaaaaaa\"\"b\",c\r\nd,e\r\n", config);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], CellValue::from("aaaaaaaaaaaaa\"b"));
        assert_eq!(rows[1], vec![CellValue::from("d"), CellValue::from("e")]);
    }

    #[test]
    fn test_bom_and_empty_fields() {
        let rows = parse_all("\u{feff}a,,b\n", TextConfig::csv());
        assert_eq!(
            rows[0],
            vec![CellValue::from("a"), CellValue::Empty, CellValue::from("b")]
        );
    }

    #[test]
    fn test_words_are_not_coerced() {
        let rows = parse_all("yes,no,true,nan,1e3", TextConfig::csv());
        assert_eq!(rows[0][0], CellValue::from("yes"));
        assert_eq!(rows[0][1], CellValue::from("no"));
        assert_eq!(rows[0][2], CellValue::from("true"));
        assert_eq!(rows[0][3], CellValue::from("nan"));
        assert_eq!(rows[0][4], CellValue::Float(1000.0));
    }

    #[test]
    fn test_trim_whitespace() {
        let config = TextConfig::csv().with_trim_whitespace(true);
        let rows = parse_all(" 7 , x ", config);
        assert_eq!(rows[0], vec![CellValue::Int(7), CellValue::from("x")]);
    }
}
