//! Excel (.xlsx) spreadsheet support.
//!
//! - [`XlsxPackage`] opens a workbook and materialises worksheets as
//!   [`Table`](crate::sheet::Table)s.
//! - [`writer::WorkbookWriter`] assembles a new workbook from tables.
//!
//! # Example
//!
//! ```rust,no_run
//! use excel_chart_generator::ooxml::xlsx::XlsxPackage;
//!
//! let mut package = XlsxPackage::open("responses.xlsx")?;
//! println!("Sheets: {:?}", package.sheet_names());
//! let table = package.first_sheet_table()?;
//! println!("{} columns", table.column_count());
//! # Ok::<(), excel_chart_generator::Error>(())
//! ```

mod package;
pub mod parsers;
pub mod reference;
mod shared_strings;
pub mod writer;

pub use package::{SheetEntry, XlsxPackage};
pub use shared_strings::SharedStrings;
