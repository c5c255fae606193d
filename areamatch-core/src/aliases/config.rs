//! Configuration structures and validation
//!
//! This module defines the TOML schema for alias tables.

use serde::{Deserialize, Serialize};

/// Root alias table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasConfig {
    pub metadata: Metadata,
    #[serde(default)]
    pub suffixes: Vec<SuffixAlias>,
    #[serde(default)]
    pub prefixes: Vec<PrefixAlias>,
}

/// Table metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Street-type suffix ("strasse" → "str")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixAlias {
    pub canonical: String,
    pub variants: Vec<String>,
    /// Suffix is written fused to the street name
    #[serde(default)]
    pub compound: bool,
}

/// Leading-word alias ("St." → "sankt")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixAlias {
    pub canonical: String,
    pub variants: Vec<String>,
}

/// Lowercase and drop abbreviation dots so table entries compare the way
/// normalized words do.
pub(crate) fn canonical_form(entry: &str) -> String {
    entry.trim().to_lowercase().trim_end_matches('.').to_string()
}

impl AliasConfig {
    /// Validate configuration
    ///
    /// Rejects tables under which normalization would stop being idempotent.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let suffix_canonicals: Vec<String> = self
            .suffixes
            .iter()
            .map(|s| canonical_form(&s.canonical))
            .collect();
        let prefix_canonicals: Vec<String> = self
            .prefixes
            .iter()
            .map(|p| canonical_form(&p.canonical))
            .collect();

        let all_entries = self
            .suffixes
            .iter()
            .map(|s| (&s.canonical, &s.variants))
            .chain(self.prefixes.iter().map(|p| (&p.canonical, &p.variants)));

        for (canonical, variants) in all_entries {
            check_entry(canonical)?;
            for variant in variants {
                check_entry(variant)?;
            }
        }

        let all_variants: Vec<String> = self
            .suffixes
            .iter()
            .flat_map(|s| s.variants.iter())
            .chain(self.prefixes.iter().flat_map(|p| p.variants.iter()))
            .map(|v| canonical_form(v))
            .collect();

        for canonical in suffix_canonicals.iter().chain(prefix_canonicals.iter()) {
            if all_variants.iter().any(|v| v == canonical)
                && !self.is_own_variant(canonical)
            {
                return Err(format!("canonical '{canonical}' is a variant of another entry"));
            }
        }

        for suffix in self.suffixes.iter().filter(|s| s.compound) {
            let canonical = canonical_form(&suffix.canonical);
            for other in self.suffixes.iter().filter(|s| s.compound) {
                for variant in other.variants.iter().map(|v| canonical_form(v)) {
                    if variant != canonical && canonical.ends_with(&variant) {
                        return Err(format!(
                            "compound canonical '{canonical}' ends with variant '{variant}'"
                        ));
                    }
                }
            }
        }

        for prefix in &self.prefixes {
            for variant in prefix.variants.iter().map(|v| canonical_form(v)) {
                if suffix_canonicals.contains(&variant) {
                    return Err(format!(
                        "prefix variant '{variant}' collides with a suffix canonical"
                    ));
                }
            }
        }

        Ok(())
    }

    /// A variant that reduces to its own canonical ("str." for "str") is harmless
    fn is_own_variant(&self, canonical: &str) -> bool {
        let owners = self
            .suffixes
            .iter()
            .map(|s| (&s.canonical, &s.variants))
            .chain(self.prefixes.iter().map(|p| (&p.canonical, &p.variants)));

        for (owner, variants) in owners {
            let owner = canonical_form(owner);
            let hits = variants.iter().any(|v| canonical_form(v) == canonical);
            if hits && owner != canonical {
                return false;
            }
        }
        true
    }
}

fn check_entry(entry: &str) -> Result<(), String> {
    let form = canonical_form(entry);
    if form.is_empty() {
        return Err("empty alias entry".to_string());
    }
    if form.chars().any(char::is_whitespace) {
        return Err(format!("alias entry '{entry}' contains whitespace"));
    }
    Ok(())
}
