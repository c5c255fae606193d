//! Alias table loader
//!
//! Manages the embedded alias tables with caching.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::aliases::table::AliasTable;
use crate::error::{AliasError, Result};

/// Code of the table used when none is requested
pub const DEFAULT_TABLE: &str = "de-CH";

/// Embedded alias tables
static EMBEDDED: OnceLock<HashMap<String, Arc<AliasTable>>> = OnceLock::new();

fn embedded() -> &'static HashMap<String, Arc<AliasTable>> {
    EMBEDDED.get_or_init(|| {
        let mut map = HashMap::new();

        // Swiss German
        match AliasTable::from_toml_str(include_str!("../../configs/aliases/swiss_german.toml")) {
            Ok(table) => {
                let table = Arc::new(table);
                for code in ["de-CH", "de-ch", "german"] {
                    map.insert(code.to_string(), table.clone());
                }
            }
            Err(e) => log::warn!("Failed to load Swiss German aliases: {e}"),
        }

        // English
        match AliasTable::from_toml_str(include_str!("../../configs/aliases/english.toml")) {
            Ok(table) => {
                let table = Arc::new(table);
                for code in ["en-US", "en", "english"] {
                    map.insert(code.to_string(), table.clone());
                }
            }
            Err(e) => log::warn!("Failed to load English aliases: {e}"),
        }

        map
    })
}

/// Look up an embedded alias table by code
pub fn get_table(code: &str) -> Result<Arc<AliasTable>> {
    embedded()
        .get(code)
        .cloned()
        .ok_or_else(|| AliasError::UnknownTable(code.to_string()))
}

/// The default Swiss German table, or an empty one if it failed to load
pub fn default_table() -> Arc<AliasTable> {
    get_table(DEFAULT_TABLE).unwrap_or_else(|_| Arc::new(AliasTable::empty()))
}

/// Codes of all embedded tables, sorted
pub fn list_tables() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = embedded().keys().map(String::as_str).collect();
    codes.sort_unstable();
    codes
}
