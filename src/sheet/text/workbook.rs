//! Table loading for text-based formats

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::parser::TextParser;
use crate::common::Result;
use crate::sheet::Table;

/// Configuration for parsing text-based spreadsheet files
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Field delimiter character
    pub delimiter: u8,
    /// Quote character for quoted fields
    pub quote: u8,
    /// Whether to trim whitespace from fields
    pub trim_whitespace: bool,
    /// Buffer size for reading
    pub buffer_size: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',        // CSV default
            quote: b'"',            // Standard CSV quoting
            trim_whitespace: false, // Preserve whitespace by default
            buffer_size: 8192,      // 8KB buffer
        }
    }
}

impl TextConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Comma separated values
    pub fn csv() -> Self {
        Self::default()
    }

    /// Tab separated values
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Enable or disable whitespace trimming
    pub fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }
}

/// Read every row of a delimited source into a [`Table`].
///
/// The first non-blank row is the header.
pub fn read_table<R: Read>(reader: R, config: TextConfig) -> Result<Table> {
    let mut parser = TextParser::new(reader, config);
    let mut rows = Vec::new();
    while let Some(row) = parser.parse_row()? {
        rows.push(row);
    }
    Ok(Table::from_rows(rows))
}

/// Open a delimited file from disk.
pub fn open_table<P: AsRef<Path>>(path: P, config: TextConfig) -> Result<Table> {
    let file = File::open(path.as_ref())?;
    read_table(BufReader::new(file), config)
}
