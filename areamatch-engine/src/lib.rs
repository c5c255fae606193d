//! Batch orchestration for service-area matching
//!
//! This crate wires the `areamatch-core` parser and matcher into a
//! configurable engine: TOML configuration, a per-run parse cache,
//! sequential and parallel batch executors, and coverage aggregation over
//! craftsmen and properties.
//!
//! # Example
//!
//! ```rust
//! use areamatch_engine::{AreaMatcher, MatchJob};
//!
//! let matcher = AreaMatcher::builder().alias_table("de-CH").build().unwrap();
//! let jobs = vec![
//!     MatchJob::new(
//!         matcher.parse_address("Zürcherstrasse 71"),
//!         "Zürcherstr. 65 / 67 / 69 / 71",
//!     ),
//!     MatchJob::new(
//!         matcher.parse_address("Im Struppen 18"),
//!         "Im Struppen 11-17, 19, 21",
//!     ),
//! ];
//! let results = matcher.match_batch(&jobs);
//! assert!(results[0].matched);
//! assert!(!results[1].matched);
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod coverage;
pub mod error;
pub mod executor;
pub mod processor;

// Re-export key types
pub use cache::{CacheStats, ParseCache};
pub use config::EngineConfig;
pub use coverage::{
    CategoryGap, CategoryMatch, CoverageAnalyzer, CoverageSummary, Craftsman, GapCount,
    PropertyCoverage,
};
pub use error::{EngineError, Result};
pub use executor::{auto_select, ExecutionMode, Executor};
pub use processor::{AreaMatcher, AreaMatcherBuilder, MatchJob};

// Re-export from core for convenience
pub use areamatch_core::{
    Diagnostic, MatchReason, MatchResult, ParsedAddress, ParsedArea, ParsedGroup,
};
