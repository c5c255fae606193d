//! Area matcher facade and builder
//!
//! Ties the configured alias table, parser, matcher, parse cache and batch
//! executors together behind one entry point.

use std::path::PathBuf;
use std::sync::Arc;

use areamatch_core::{
    AreaParser, Diagnostic, MatchResult, Matcher, Normalizer, ParsedAddress, ParsedArea,
};

use crate::cache::{CacheStats, ParseCache};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::executor::{auto_select, ExecutionMode, Executor, SequentialExecutor};

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// One address to check against one service-area text
#[derive(Debug, Clone, PartialEq)]
pub struct MatchJob {
    /// Property address
    pub address: ParsedAddress,
    /// Raw service-area text as written by the craftsman
    pub service_area: String,
}

impl MatchJob {
    /// Create a job
    pub fn new(address: ParsedAddress, service_area: impl Into<String>) -> Self {
        Self {
            address,
            service_area: service_area.into(),
        }
    }
}

/// Main entry point for parsing service areas and matching addresses
#[derive(Debug)]
pub struct AreaMatcher {
    parser: AreaParser,
    matcher: Matcher,
    cache: Option<ParseCache>,
    sequential: SequentialExecutor,
    #[cfg(feature = "parallel")]
    parallel: Option<ParallelExecutor>,
    config: EngineConfig,
}

impl AreaMatcher {
    /// Create a matcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create a matcher with custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let table = config.load_alias_table()?;
        log::debug!("Using alias table '{}'", table.code());
        let normalizer = Normalizer::with_table(table);

        #[cfg(feature = "parallel")]
        let parallel = match config.execution_mode {
            ExecutionMode::Sequential => None,
            ExecutionMode::Parallel | ExecutionMode::Adaptive => {
                Some(ParallelExecutor::new(config.threads)?)
            }
        };

        #[cfg(not(feature = "parallel"))]
        if config.execution_mode == ExecutionMode::Parallel {
            log::warn!(
                "Parallel execution requested but the `parallel` feature is disabled; running sequentially"
            );
        }

        Ok(Self {
            parser: AreaParser::with_normalizer(config.parser_config(), normalizer.clone()),
            matcher: Matcher::new(normalizer),
            cache: config.cache_enabled.then(ParseCache::new),
            sequential: SequentialExecutor,
            #[cfg(feature = "parallel")]
            parallel,
            config,
        })
    }

    /// Create a builder
    pub fn builder() -> AreaMatcherBuilder {
        AreaMatcherBuilder::new()
    }

    /// Configuration this matcher was built from
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalizer for the configured alias table
    pub fn normalizer(&self) -> &Normalizer {
        self.parser.normalizer()
    }

    /// Parse a service-area text, through the cache when enabled
    pub fn parse(&self, service_area: &str) -> Arc<ParsedArea> {
        match &self.cache {
            Some(cache) => cache.get_or_parse(service_area, |raw| self.parser.parse(raw)),
            None => Arc::new(self.parser.parse(service_area)),
        }
    }

    /// Parse a property string with the configured alias table
    pub fn parse_address(&self, property: &str) -> ParsedAddress {
        ParsedAddress::parse_with(property, self.normalizer())
    }

    /// Parse a property string into one address per house number
    pub fn parse_addresses(&self, property: &str) -> Vec<ParsedAddress> {
        ParsedAddress::parse_all_with(property, self.normalizer())
    }

    /// Decide whether `address` lies in `service_area`
    pub fn match_address(&self, address: &ParsedAddress, service_area: &str) -> MatchResult {
        let area = self.parse(service_area);
        self.matcher.match_area(address, &area)
    }

    /// Evaluate many jobs; results keep the order of `jobs`
    pub fn match_batch(&self, jobs: &[MatchJob]) -> Vec<MatchResult> {
        let mode = self.select_mode(jobs.len());
        log::debug!("Matching {} jobs in {:?} mode", jobs.len(), mode);

        let run = |job: &MatchJob| self.match_address(&job.address, &job.service_area);
        match mode {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => match &self.parallel {
                Some(executor) => executor.execute(jobs, run),
                None => self.sequential.execute(jobs, run),
            },
            _ => self.sequential.execute(jobs, run),
        }
    }

    /// Parser findings for a service-area text
    pub fn diagnostics(&self, service_area: &str) -> Vec<Diagnostic> {
        self.parse(service_area).diagnostics.clone()
    }

    /// Cache counters, `None` when caching is disabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ParseCache::stats)
    }

    /// Forget cached parses, e.g. before a new run
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    fn select_mode(&self, batch_len: usize) -> ExecutionMode {
        match self.config.execution_mode {
            ExecutionMode::Adaptive => auto_select(batch_len, self.config.parallel_threshold),
            mode => mode,
        }
    }
}

/// Builder for AreaMatcher
///
/// Provides a fluent interface for configuring the matcher.
#[derive(Debug, Clone, Default)]
pub struct AreaMatcherBuilder {
    config: EngineConfig,
}

impl AreaMatcherBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Set the embedded alias table by code
    pub fn alias_table<S: Into<String>>(mut self, code: S) -> Self {
        self.config.alias_table = code.into();
        self
    }

    /// Load the alias table from a TOML file
    pub fn alias_table_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.alias_table_path = Some(path.into());
        self
    }

    /// Set the low-confidence threshold
    pub fn low_confidence_threshold(mut self, threshold: f32) -> Self {
        self.config.low_confidence_threshold = threshold;
        self
    }

    /// Set the widest expanded range
    pub fn max_range_span(mut self, span: u32) -> Self {
        self.config.max_range_span = span;
        self
    }

    /// Enable or disable the parse cache
    pub fn cache(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config.threads = count;
        self
    }

    /// Set the adaptive batch-size threshold
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    /// Build the matcher
    pub fn build(self) -> Result<AreaMatcher> {
        AreaMatcher::with_config(self.config)
    }
}
