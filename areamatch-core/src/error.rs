//! Core error types
//!
//! Parsing and matching are total and never fail; only loading an alias
//! table can go wrong.

use thiserror::Error;

/// Errors raised while building an alias table
#[derive(Debug, Error)]
pub enum AliasError {
    /// The TOML document could not be parsed
    #[error("Failed to parse alias table: {0}")]
    Parse(String),

    /// The table parsed but violates a structural rule
    #[error("Invalid alias table '{code}': {reason}")]
    Invalid {
        /// Table code from the metadata section
        code: String,
        /// Which rule was violated
        reason: String,
    },

    /// No table registered under the requested code
    #[error("Unknown alias table: {0}")]
    UnknownTable(String),

    /// Reading a table file failed
    #[error("I/O error reading alias table: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for alias table operations
pub type Result<T> = std::result::Result<T, AliasError>;
