//! Runtime alias table built from configuration

use std::path::Path;

use crate::aliases::config::{canonical_form, AliasConfig};
use crate::error::{AliasError, Result};

#[derive(Debug, Clone)]
struct SuffixRule {
    canonical: String,
    /// Sorted longest first so "strasse" wins over "str"
    variants: Vec<String>,
    compound: bool,
}

#[derive(Debug, Clone)]
struct PrefixRule {
    canonical: String,
    variants: Vec<String>,
}

/// Street-name alias rules for one locale
#[derive(Debug, Clone)]
pub struct AliasTable {
    code: String,
    name: String,
    suffixes: Vec<SuffixRule>,
    prefixes: Vec<PrefixRule>,
}

impl AliasTable {
    /// Build a table from a parsed configuration
    pub fn from_config(config: &AliasConfig) -> Result<Self> {
        config.validate().map_err(|reason| AliasError::Invalid {
            code: config.metadata.code.clone(),
            reason,
        })?;

        let suffixes = config
            .suffixes
            .iter()
            .map(|s| {
                let canonical = canonical_form(&s.canonical);
                let mut variants: Vec<String> = s
                    .variants
                    .iter()
                    .map(|v| canonical_form(v))
                    .filter(|v| *v != canonical)
                    .collect();
                variants.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
                variants.dedup();
                SuffixRule {
                    canonical,
                    variants,
                    compound: s.compound,
                }
            })
            .collect();

        let prefixes = config
            .prefixes
            .iter()
            .map(|p| {
                let canonical = canonical_form(&p.canonical);
                let variants = p
                    .variants
                    .iter()
                    .map(|v| canonical_form(v))
                    .filter(|v| *v != canonical)
                    .collect();
                PrefixRule {
                    canonical,
                    variants,
                }
            })
            .collect();

        Ok(Self {
            code: config.metadata.code.clone(),
            name: config.metadata.name.clone(),
            suffixes,
            prefixes,
        })
    }

    /// Parse and build a table from a TOML document
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: AliasConfig =
            toml::from_str(toml_str).map_err(|e| AliasError::Parse(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Read a table from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading alias table from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// A table with no rules; normalization only lowercases and cleans
    pub fn empty() -> Self {
        Self {
            code: "none".to_string(),
            name: "No aliases".to_string(),
            suffixes: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rewrite a single lowercase word through the suffix rules
    pub(crate) fn apply_suffix(&self, word: &str) -> String {
        for rule in &self.suffixes {
            if rule.compound {
                for variant in &rule.variants {
                    if let Some(stem) = word.strip_suffix(variant.as_str()) {
                        return format!("{stem}{}", rule.canonical);
                    }
                }
            } else if rule.variants.iter().any(|v| v == word) {
                return rule.canonical.clone();
            }
        }
        word.to_string()
    }

    /// Rewrite the leading word through the prefix rules
    pub(crate) fn apply_prefix(&self, word: &str) -> String {
        self.prefixes
            .iter()
            .find(|rule| rule.variants.iter().any(|v| v == word))
            .map(|rule| rule.canonical.clone())
            .unwrap_or_else(|| word.to_string())
    }

    /// Whether the word is exactly a compound canonical ("str")
    pub(crate) fn is_compound_canonical(&self, word: &str) -> bool {
        self.suffixes
            .iter()
            .any(|rule| rule.compound && rule.canonical == word)
    }

    /// Compound canonicals, for hyphen collapsing
    pub(crate) fn compound_canonicals(&self) -> impl Iterator<Item = &str> {
        self.suffixes
            .iter()
            .filter(|rule| rule.compound)
            .map(|rule| rule.canonical.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        [metadata]
        code = "t"
        name = "Test"

        [[suffixes]]
        canonical = "str"
        variants = ["str.", "strasse", "straße"]
        compound = true

        [[suffixes]]
        canonical = "ave"
        variants = ["avenue"]

        [[prefixes]]
        canonical = "sankt"
        variants = ["st."]
    "#;

    #[test]
    fn test_compound_suffix_longest_first() {
        let table = AliasTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.apply_suffix("zürcherstrasse"), "zürcherstr");
        assert_eq!(table.apply_suffix("zürcherstraße"), "zürcherstr");
        assert_eq!(table.apply_suffix("zürcherstr"), "zürcherstr");
    }

    #[test]
    fn test_whole_word_suffix() {
        let table = AliasTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.apply_suffix("avenue"), "ave");
        assert_eq!(table.apply_suffix("parkavenue"), "parkavenue");
    }

    #[test]
    fn test_prefix() {
        let table = AliasTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.apply_prefix("st"), "sankt");
        assert_eq!(table.apply_prefix("gallen"), "gallen");
    }

    #[test]
    fn test_metadata() {
        let table = AliasTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.code(), "t");
        assert_eq!(table.name(), "Test");
        assert!(table.is_compound_canonical("str"));
        assert!(!table.is_compound_canonical("ave"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = AliasTable::from_toml_str("not = [valid");
        assert!(matches!(result, Err(AliasError::Parse(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let result = AliasTable::from_file("/nonexistent/aliases.toml");
        assert!(matches!(result, Err(AliasError::Io(_))));
    }
}
