//! Unified error types for the chart generator.
//!
//! This module provides a single error type covering spreadsheet input,
//! package output, chart rendering and configuration failures.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
