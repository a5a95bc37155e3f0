//! Common types and utilities shared across readers, writers and renderers.

// Submodule declarations
pub mod error;
pub mod svg;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use xml::{escape_xml, unescape_xml};
