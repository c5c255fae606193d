//! Value types produced by parsing and matching
//!
//! Everything here is created per call and owned by the caller. The types
//! serialize so reporting code can consume them without touching internals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::diagnostics::Diagnostic;
use crate::domain::tokenizer::Delimiter;

// ============================================================================
// Segment classification
// ============================================================================

/// What a delimiter-split segment was recognized as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentLabel {
    /// A street name, possibly with house numbers written after (or before) it
    Street {
        /// Normalized street name
        name: String,
        /// Number tokens such as `"5"` or `"3-7"`
        attached_numbers: Vec<String>,
    },
    /// House numbers without a street of their own
    NumberList { numbers: Vec<String> },
    /// Postal code, optionally followed by a city
    PostalCity {
        postal_code: String,
        city: Option<String>,
    },
    /// Not recognized; excluded from matching
    Unknown,
}

impl SegmentLabel {
    pub fn is_unknown(&self) -> bool {
        matches!(self, SegmentLabel::Unknown)
    }

    /// Whether the segment contributes house numbers
    pub fn carries_numbers(&self) -> bool {
        match self {
            SegmentLabel::Street {
                attached_numbers, ..
            } => !attached_numbers.is_empty(),
            SegmentLabel::NumberList { numbers } => !numbers.is_empty(),
            _ => false,
        }
    }
}

/// Classifier verdict for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SegmentLabel,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: SegmentLabel, confidence: f32) -> Self {
        Self { label, confidence }
    }

    pub fn unknown() -> Self {
        Self::new(SegmentLabel::Unknown, 0.0)
    }
}

/// A segment of the input together with its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSegment {
    pub text: String,
    /// Byte offset into the raw service-area string
    pub offset: usize,
    pub classification: Classification,
}

// ============================================================================
// Groups
// ============================================================================

/// One (street, numbers, postal code) unit extracted from a service area
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedGroup {
    /// Normalized street name; `None` only for postal-code-only groups
    pub street: Option<String>,
    pub numbers: BTreeSet<u32>,
    /// Numbers written with leading zeros, kept verbatim (`"007"`)
    pub literal_numbers: BTreeSet<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub confidence: f32,
    /// Indices into [`ParsedArea::segments`] this group was built from
    pub segments: Vec<usize>,
}

impl ParsedGroup {
    /// A street listed without numbers covers every house on it
    pub fn is_whole_street(&self) -> bool {
        self.street.is_some() && self.numbers.is_empty() && self.literal_numbers.is_empty()
    }

    /// Numbers present without a street: must never reach the matcher
    pub fn is_orphaned(&self) -> bool {
        self.street.is_none() && (!self.numbers.is_empty() || !self.literal_numbers.is_empty())
    }
}

// ============================================================================
// Parse result
// ============================================================================

/// Everything extracted from one raw service-area string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedArea {
    pub raw: String,
    pub segments: Vec<ClassifiedSegment>,
    pub groups: Vec<ParsedGroup>,
    pub diagnostics: Vec<Diagnostic>,
    /// Delimiter chosen for the top-level split of the first line
    pub primary_delimiter: Option<Delimiter>,
}

impl ParsedArea {
    pub(crate) fn empty(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            segments: Vec::new(),
            groups: Vec::new(),
            diagnostics: vec![Diagnostic::EmptyInput],
            primary_delimiter: None,
        }
    }

    /// Segments that classified as unknown
    pub fn unknown_segments(&self) -> impl Iterator<Item = &ClassifiedSegment> {
        self.segments
            .iter()
            .filter(|s| s.classification.label.is_unknown())
    }

    /// Groups below the given confidence
    pub fn low_confidence_groups(&self, threshold: f32) -> impl Iterator<Item = &ParsedGroup> {
        self.groups.iter().filter(move |g| g.confidence < threshold)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ============================================================================
// Match verdicts
// ============================================================================

/// Which rule of the matching cascade decided the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    ExactAddressSubstring,
    StreetAndNumberInRange,
    NormalizedStreetAndNumber,
    AdaptivePatternFallback,
    NoMatch,
}

impl MatchReason {
    /// Fixed confidence per rule, strictly decreasing down the cascade
    pub fn confidence(self) -> f32 {
        match self {
            MatchReason::ExactAddressSubstring => 1.0,
            MatchReason::StreetAndNumberInRange => 0.9,
            MatchReason::NormalizedStreetAndNumber => 0.85,
            MatchReason::AdaptivePatternFallback => 0.5,
            MatchReason::NoMatch => 0.0,
        }
    }
}

/// Coverage verdict for one address against one service area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: bool,
    pub matched_group: Option<ParsedGroup>,
    pub confidence: f32,
    pub reason: MatchReason,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            matched: false,
            matched_group: None,
            confidence: 0.0,
            reason: MatchReason::NoMatch,
        }
    }

    pub(crate) fn hit(reason: MatchReason, group: Option<&ParsedGroup>) -> Self {
        Self {
            matched: true,
            matched_group: group.cloned(),
            confidence: reason.confidence(),
            reason,
        }
    }
}
