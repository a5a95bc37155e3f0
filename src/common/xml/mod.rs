//! XML helpers shared by the xlsx reader and writer.

pub mod escape;

pub use escape::{escape_xml, unescape_xml};
