//! Per-run cache of parsed service areas
//!
//! The same service-area text is matched against many properties. Entries
//! are populate-once: when two workers parse the same text concurrently,
//! the first inserted value wins and the other is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use areamatch_core::ParsedArea;
use dashmap::DashMap;
use serde::Serialize;

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Distinct service areas stored
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to parse
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe map from raw service-area text to its parse
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: DashMap<String, Arc<ParsedArea>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ParseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached parse of `raw`, running `parse` on a miss
    pub fn get_or_parse<F>(&self, raw: &str, parse: F) -> Arc<ParsedArea>
    where
        F: FnOnce(&str) -> ParsedArea,
    {
        if let Some(entry) = self.entries.get(raw) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(entry.value());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Parse outside the shard lock
        let parsed = Arc::new(parse(raw));
        let entry = self.entries.entry(raw.to_string()).or_insert(parsed);
        Arc::clone(entry.value())
    }

    /// Number of cached service areas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use areamatch_core::parse_area;
    use std::thread;

    #[test]
    fn test_hit_after_miss() {
        let cache = ParseCache::new();
        let first = cache.get_or_parse("Seestr. 5", parse_area);
        let second = cache.get_or_parse("Seestr. 5", parse_area);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
        assert_eq!(cache.stats().hit_rate(), 0.5);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = ParseCache::new();
        let first = cache.get_or_parse("Seestr. 5", parse_area);
        // A late writer's value is discarded
        let entry = cache
            .entries
            .entry("Seestr. 5".to_string())
            .or_insert(Arc::new(parse_area("x")));
        assert!(Arc::ptr_eq(&first, entry.value()));
    }

    #[test]
    fn test_concurrent_population() {
        let cache = Arc::new(ParseCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_parse("Baslerstr. 1/3", parse_area))
            })
            .collect();
        let results: Vec<Arc<ParsedArea>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.len(), 1);
        for result in &results {
            assert_eq!(result.groups, results[0].groups);
        }
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 8);
    }

    #[test]
    fn test_clear() {
        let cache = ParseCache::new();
        cache.get_or_parse("Seestr. 5", parse_area);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
