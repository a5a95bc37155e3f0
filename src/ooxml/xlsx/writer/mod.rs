//! Workbook writer components for XLSX.

pub mod sheet;
pub mod strings;
pub mod template;
pub mod workbook;

// Re-export main types
pub use sheet::MutableWorksheet;
pub use strings::MutableSharedStrings;
pub use workbook::{DocumentProperties, WorkbookWriter, sanitize_sheet_name};
