//! Adaptive parsing of free-text service areas and address matching
//!
//! Craftsmen describe the streets they serve in free text: mixed delimiters,
//! abbreviated street types, embedded postal codes, several streets per cell.
//! This crate infers structure from such a string and decides whether a
//! property address is covered by it.
//!
//! # Architecture
//!
//! - **Aliases**: TOML street-type alias tables, embedded and loadable
//! - **Domain**: normalizer, tokenizer, delimiter scorer, segment
//!   classifier, grouper, range expander and matcher
//! - **Types**: the value types handed back to callers
//!
//! # Example
//!
//! ```rust
//! use areamatch_core::{parse_area, match_address, MatchReason, ParsedAddress};
//!
//! let area = parse_area("Baslerstr. 127/129/131/133 / Calandastr. 16/18");
//! assert_eq!(area.groups.len(), 2);
//!
//! let address = ParsedAddress::new("Calandastrasse", Some(18), None);
//! let result = match_address(&address, &area);
//! assert!(result.matched);
//! assert_eq!(result.reason, MatchReason::StreetAndNumberInRange);
//! ```

pub mod aliases;
pub mod domain;
pub mod error;
pub mod types;

pub use aliases::AliasTable;
pub use domain::*;
pub use error::{AliasError, Result};
pub use types::{
    Classification, ClassifiedSegment, MatchReason, MatchResult, ParsedArea, ParsedGroup,
    SegmentLabel,
};
