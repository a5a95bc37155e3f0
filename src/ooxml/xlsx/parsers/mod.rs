//! Parsers for the XML parts of an `.xlsx` package.

pub mod text_runs;
pub mod workbook_parser;
pub mod worksheet_parser;

pub use workbook_parser::{SheetRef, parse_relationships, parse_workbook_xml};
pub use worksheet_parser::parse_worksheet_xml;
