//! Service-area parsing pipeline
//!
//! Lines → postal tail → delimiter split → classification → grouping.
//! Parsing is total: malformed input degrades into diagnostics and lower
//! confidence, never into an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::classifier::SegmentClassifier;
use crate::domain::delimiter::{DelimiterScorer, Segment};
use crate::domain::diagnostics::{Diagnostic, DEFAULT_LOW_CONFIDENCE_THRESHOLD};
use crate::domain::grouper::Grouper;
use crate::domain::normalizer::Normalizer;
use crate::domain::range::{RangeExpander, DEFAULT_MAX_RANGE_SPAN};
use crate::domain::tokenizer::tokenize;
use crate::types::ParsedArea;

/// `<postal code> <City>` closing a line
static POSTAL_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s,;/]*\b(\d{4,5}\s+\p{Lu}[\p{L}\p{M}.'’\- ]*)$").unwrap()
});

/// Parser tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Groups below this confidence are reported as diagnostics
    pub low_confidence_threshold: f32,
    /// Widest range expanded as an interval
    pub max_range_span: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            max_range_span: DEFAULT_MAX_RANGE_SPAN,
        }
    }
}

/// Parse with the default alias table and configuration
pub fn parse_area(raw: &str) -> ParsedArea {
    AreaParser::new().parse(raw)
}

#[derive(Debug, Clone)]
pub struct AreaParser {
    classifier: SegmentClassifier,
    scorer: DelimiterScorer,
    grouper: Grouper,
    config: ParserConfig,
}

impl Default for AreaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AreaParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_normalizer(config, Normalizer::new())
    }

    /// Parser using a specific alias table through `normalizer`
    pub fn with_normalizer(config: ParserConfig, normalizer: Normalizer) -> Self {
        Self {
            classifier: SegmentClassifier::new(normalizer),
            scorer: DelimiterScorer::new(),
            grouper: Grouper::new(RangeExpander::new(config.max_range_span)),
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        self.classifier.normalizer()
    }

    pub fn parse(&self, raw: &str) -> ParsedArea {
        if raw.trim().is_empty() {
            return ParsedArea::empty(raw);
        }

        let mut segments: Vec<Segment<'_>> = Vec::new();
        let mut primary_delimiter = None;

        for (base, line) in lines(raw) {
            let (head, tail) = peel_postal_tail(line, base);

            if primary_delimiter.is_none() {
                primary_delimiter = self.scorer.primary(&tokenize(head));
            }
            segments.extend(self.scorer.split_segments(head, base, &self.classifier));
            segments.extend(tail);
        }
        log::trace!("Primary delimiter {primary_delimiter:?} for '{raw}'");

        let (classified, mut diagnostics) = self.classifier.classify_segments(&segments);
        let outcome = self.grouper.group(&classified);
        diagnostics.extend(outcome.diagnostics);

        for (index, group) in outcome.groups.iter().enumerate() {
            if group.confidence < self.config.low_confidence_threshold {
                diagnostics.push(Diagnostic::LowConfidenceGroup {
                    index,
                    confidence: group.confidence,
                });
            }
        }

        ParsedArea {
            raw: raw.to_string(),
            segments: classified,
            groups: outcome.groups,
            diagnostics,
            primary_delimiter,
        }
    }
}

/// Lines of `raw` with their byte offsets
fn lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.split('\n').scan(0, |offset, line| {
        let base = *offset;
        *offset += line.len() + 1;
        Some((base, line))
    })
}

/// Split a trailing `8048 Zürich` off a line that has something before it
fn peel_postal_tail(line: &str, base: usize) -> (&str, Option<Segment<'_>>) {
    let trimmed = line.trim_end();
    let Some(caps) = POSTAL_TAIL.captures(trimmed) else {
        return (line, None);
    };
    let (Some(whole), Some(tail)) = (caps.get(0), caps.get(1)) else {
        return (line, None);
    };

    let head = &trimmed[..whole.start()];
    if !head.chars().any(char::is_alphanumeric) {
        return (line, None);
    }
    let segment = Segment {
        text: tail.as_str().trim_end(),
        offset: base + tail.start(),
        loose: false,
    };
    (head, Some(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tokenizer::Delimiter;
    use crate::types::SegmentLabel;

    #[test]
    fn test_empty_input() {
        for raw in ["", "   ", "\n\t"] {
            let area = parse_area(raw);
            assert!(area.groups.is_empty());
            assert_eq!(area.diagnostics, vec![Diagnostic::EmptyInput]);
        }
    }

    #[test]
    fn test_postal_tail_peeled() {
        let (head, tail) = peel_postal_tail("Im Struppen 8, 8048 Zürich", 0);
        assert_eq!(head, "Im Struppen 8");
        let tail = tail.unwrap();
        assert_eq!(tail.text, "8048 Zürich");
        assert_eq!(tail.offset, 15);
    }

    #[test]
    fn test_postal_alone_not_peeled() {
        let (head, tail) = peel_postal_tail("8048 Zürich", 0);
        assert_eq!(head, "8048 Zürich");
        assert!(tail.is_none());
    }

    #[test]
    fn test_lines_are_hard_boundaries() {
        let area = parse_area("Seestr. 5\nBahnhofstr. 7");
        assert_eq!(area.groups.len(), 2);
        assert_eq!(area.segments[1].offset, 10);
        assert_eq!(area.groups[1].street.as_deref(), Some("bahnhofstr"));
    }

    #[test]
    fn test_primary_delimiter_recorded() {
        let area = parse_area("Zürcherstr. 65 / 67 / 69 / 71");
        assert_eq!(area.primary_delimiter, Some(Delimiter::Slash));
    }

    #[test]
    fn test_unknown_segment_reported() {
        let area = parse_area("Seestr. 5 / (Hinterhaus)");
        assert_eq!(area.groups.len(), 1);
        assert_eq!(area.unknown_segments().count(), 1);
        assert!(area
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnparsableSegment { text, .. } if text == "(Hinterhaus)")));
    }

    #[test]
    fn test_low_confidence_group_reported() {
        let config = ParserConfig {
            low_confidence_threshold: 0.85,
            ..Default::default()
        };
        let area = AreaParser::with_config(config).parse("Seestr. 5");
        assert_eq!(
            area.diagnostics,
            vec![Diagnostic::LowConfidenceGroup {
                index: 0,
                confidence: 0.8
            }]
        );
    }

    #[test]
    fn test_max_range_span_applied() {
        let config = ParserConfig {
            max_range_span: 5,
            ..Default::default()
        };
        let area = AreaParser::with_config(config).parse("Seestr. 1-100");
        let group = &area.groups[0];
        assert_eq!(group.numbers.len(), 2);
        assert!(area
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MalformedRange { .. })));
        assert!(area
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::LowConfidenceGroup { .. })));
    }

    #[test]
    fn test_segment_labels() {
        let area = parse_area("Badenerstr.717/Im Struppen 8, 8048 Zürich");
        let labels: Vec<&SegmentLabel> = area
            .segments
            .iter()
            .map(|s| &s.classification.label)
            .collect();
        assert_eq!(labels.len(), 3);
        assert!(matches!(labels[2], SegmentLabel::PostalCity { .. }));
    }
}
