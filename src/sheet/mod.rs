//! Spreadsheet model and loaders.
//!
//! Every supported input is reduced to a [`Table`]: a header row plus data
//! rows of [`CellValue`]s.
//!
//! # Supported Formats
//!
//! - `.xlsx` / `.xlsm` - Microsoft Excel 2007+ (Office Open XML)
//! - `.csv` / `.tsv` - delimited text
//!
//! Legacy `.xls` files are recognised and rejected as unsupported.

// Submodule declarations
pub mod table;
pub mod text;
pub mod types;
mod workbook;

// Re-exports
pub use table::Table;
pub use types::CellValue;
pub use workbook::{Workbook, WorkbookFormat};
