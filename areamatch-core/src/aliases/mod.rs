//! Street-name alias tables
//!
//! Tables are TOML documents. Two are embedded in the binary; others can be
//! loaded from disk with [`AliasTable::from_file`].

pub mod config;
pub mod loader;
pub mod table;

pub use config::AliasConfig;
pub use loader::{default_table, get_table, list_tables, DEFAULT_TABLE};
pub use table::AliasTable;
