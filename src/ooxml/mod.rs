//! Office Open XML (OOXML) spreadsheet packages.
//!
//! Reading and writing of `.xlsx` workbooks: a ZIP container holding the
//! workbook, its relationships, a shared-strings table and one XML part per
//! worksheet.

pub mod xlsx;
