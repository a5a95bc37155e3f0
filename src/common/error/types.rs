//! Unified error types for the chart generator.
use thiserror::Error;

/// Main error type for chart generator operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing or generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// Input file is malformed or not in the expected format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Recognised but unsupported input
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Requested column is absent from the header row
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Invalid user-supplied parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing to chart or aggregate
    #[error("No data: {0}")]
    NoData(String),

    /// Configuration file could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for chart generator operations.
pub type Result<T> = std::result::Result<T, Error>;
