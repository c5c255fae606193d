//! Street-name normalization
//!
//! Two spellings a person would read as the same street must produce the
//! same string here; every street comparison in the crate goes through it.

use std::sync::{Arc, LazyLock};

use crate::aliases::{default_table, AliasTable};

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::new);

/// Normalize with the default (de-CH) alias table
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Characters stripped from the edges of a name and dropped as standalone words
pub(crate) fn is_noise(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(c, '–' | '—' | '‘' | '’' | '«' | '»' | '“' | '”')
}

fn is_dash(c: char) -> bool {
    matches!(c, '-' | '–' | '—')
}

/// Canonicalizes street names against an alias table
#[derive(Debug, Clone)]
pub struct Normalizer {
    table: Arc<AliasTable>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_table(default_table())
    }

    pub fn with_table(table: Arc<AliasTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AliasTable {
        &self.table
    }

    /// Canonical form of a street name. Total and idempotent.
    pub fn normalize(&self, raw: &str) -> String {
        let folded = raw.to_lowercase();
        let trimmed = folded.trim_matches(is_noise);

        let mut words: Vec<String> = trimmed
            .split_whitespace()
            .map(|w| w.trim_end_matches('.'))
            .filter(|w| !w.is_empty() && !w.chars().all(is_noise))
            .map(str::to_string)
            .collect();

        if words.len() > 1 {
            words[0] = self.table.apply_prefix(&words[0]);
        }

        let words: Vec<String> = words
            .iter()
            .map(|w| self.collapse_hyphen(&self.table.apply_suffix(w)))
            .collect();

        // "Basler Str" and "Basler-Str" are written fused as "baslerstr"
        let mut out: Vec<String> = Vec::with_capacity(words.len());
        for word in words {
            match out.last_mut() {
                Some(prev) if self.table.is_compound_canonical(&word) => {
                    let stem_len = prev.trim_end_matches(is_dash).len();
                    prev.truncate(stem_len);
                    prev.push_str(&word);
                }
                _ => out.push(word),
            }
        }

        out.join(" ")
    }

    fn collapse_hyphen(&self, word: &str) -> String {
        for canonical in self.table.compound_canonicals() {
            if let Some(stem) = word.strip_suffix(canonical) {
                if stem.ends_with(is_dash) {
                    return format!("{}{canonical}", stem.trim_end_matches(is_dash));
                }
            }
        }
        word.to_string()
    }
}
