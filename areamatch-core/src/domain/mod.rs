//! Parsing and matching domain logic
//!
//! Leaf-first: normalizer, tokenizer, delimiter scoring, classification,
//! grouping with range expansion, and finally the matcher.

pub mod address;
pub mod classifier;
pub mod delimiter;
pub mod diagnostics;
pub mod grouper;
pub mod matcher;
pub mod normalizer;
pub mod parser;
pub mod range;
pub mod tokenizer;

pub use address::ParsedAddress;
pub use classifier::{classify, ClassifierRule, SegmentClassifier};
pub use delimiter::{score_delimiters, DelimiterScore, DelimiterScorer, Segment};
pub use diagnostics::{Diagnostic, DEFAULT_LOW_CONFIDENCE_THRESHOLD};
pub use grouper::{group, Grouper, GroupingOutcome};
pub use matcher::{match_address, Matcher};
pub use normalizer::{normalize, Normalizer};
pub use parser::{parse_area, AreaParser, ParserConfig};
pub use range::{expand_ranges, RangeExpander, RangeExpansion, DEFAULT_MAX_RANGE_SPAN};
pub use tokenizer::{tokenize, Atom, AtomKind, Delimiter};
