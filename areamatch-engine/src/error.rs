//! Engine error types
//!
//! Parsing and matching never fail; only building an engine from
//! configuration does.

use areamatch_core::AliasError;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Alias table could not be loaded
    #[error("alias table error: {0}")]
    Alias(#[from] AliasError),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration document is not valid TOML
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker pool could not be built
    #[cfg(feature = "parallel")]
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
