//! Configuration types for the engine

use std::path::{Path, PathBuf};
use std::sync::Arc;

use areamatch_core::aliases::{get_table, DEFAULT_TABLE};
use areamatch_core::{
    AliasTable, ParserConfig, DEFAULT_LOW_CONFIDENCE_THRESHOLD, DEFAULT_MAX_RANGE_SPAN,
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::executor::ExecutionMode;

/// Default batch size from which adaptive mode goes parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Engine configuration
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes:
///
/// ```toml
/// alias_table = "en-US"
/// execution_mode = "parallel"
/// threads = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Code of an embedded alias table
    pub alias_table: String,
    /// Alias table file; takes precedence over `alias_table`
    pub alias_table_path: Option<PathBuf>,
    /// Groups below this confidence are reported as diagnostics
    pub low_confidence_threshold: f32,
    /// Widest number range expanded as an interval
    pub max_range_span: u32,
    /// Reuse parsed service areas within a run
    pub cache_enabled: bool,
    /// Execution mode selector
    pub execution_mode: ExecutionMode,
    /// Number of threads for parallel execution (None = auto)
    pub threads: Option<usize>,
    /// Minimum batch size for parallel processing in adaptive mode
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alias_table: DEFAULT_TABLE.to_string(),
            alias_table_path: None,
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            max_range_span: DEFAULT_MAX_RANGE_SPAN,
            cache_enabled: true,
            execution_mode: ExecutionMode::Adaptive,
            threads: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loading engine configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Single-threaded configuration
    pub fn sequential() -> Self {
        Self {
            execution_mode: ExecutionMode::Sequential,
            threads: Some(1),
            ..Self::default()
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.alias_table_path.is_none() && self.alias_table.trim().is_empty() {
            return Err(EngineError::Config(
                "alias_table must name a table when no alias_table_path is set".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(EngineError::Config(format!(
                "low_confidence_threshold must be within 0.0..=1.0, got {}",
                self.low_confidence_threshold
            )));
        }
        if self.threads == Some(0) {
            return Err(EngineError::Config("threads must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parser settings carried by this configuration
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            low_confidence_threshold: self.low_confidence_threshold,
            max_range_span: self.max_range_span,
        }
    }

    /// Resolve the configured alias table
    pub fn load_alias_table(&self) -> Result<Arc<AliasTable>> {
        match &self.alias_table_path {
            Some(path) => Ok(Arc::new(AliasTable::from_file(path)?)),
            None => Ok(get_table(&self.alias_table)?),
        }
    }
}
