//! Text-based spreadsheet format support (CSV, TSV)
//!
//! Delimited exports are parsed with a streaming byte parser that handles
//! quoted fields, doubled-quote escapes, embedded newlines, CRLF line endings
//! and a leading UTF-8 byte order mark.
//!
//! # Example
//!
//! ```rust
//! use excel_chart_generator::sheet::text::{TextConfig, read_table};
//!
//! let csv = "Name,Score\nAda,5\nLin,4\n";
//! let table = read_table(csv.as_bytes(), TextConfig::csv())?;
//! assert_eq!(table.headers(), &["Name", "Score"]);
//! assert_eq!(table.row_count(), 2);
//! # Ok::<(), excel_chart_generator::Error>(())
//! ```

pub mod parser;
pub mod workbook;

pub use parser::TextParser;
pub use workbook::{TextConfig, open_table, read_table};
