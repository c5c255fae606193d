//! Assembling classified segments into groups
//!
//! A single accumulator walks the segment stream. Number-only segments
//! inherit the last street seen; a postal code closes the current group.

use crate::domain::diagnostics::Diagnostic;
use crate::domain::range::RangeExpander;
use crate::types::{ClassifiedSegment, ParsedGroup, SegmentLabel};

/// Groups plus the soft conditions met while building them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingOutcome {
    pub groups: Vec<ParsedGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Group with the default range expander
pub fn group(segments: &[ClassifiedSegment]) -> GroupingOutcome {
    Grouper::default().group(segments)
}

#[derive(Debug, Default)]
struct Accumulator {
    street: Option<String>,
    tokens: Vec<String>,
    postal_code: Option<String>,
    city: Option<String>,
    confidence: Option<f32>,
    segments: Vec<usize>,
}

impl Accumulator {
    fn is_empty(&self) -> bool {
        self.street.is_none() && self.tokens.is_empty() && self.postal_code.is_none()
    }

    fn holds_only_orphans(&self) -> bool {
        self.street.is_none() && !self.tokens.is_empty()
    }

    fn absorb(&mut self, index: usize, confidence: f32) {
        self.segments.push(index);
        self.confidence = Some(self.confidence.map_or(confidence, |c| c.min(confidence)));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Grouper {
    expander: RangeExpander,
}

impl Grouper {
    pub fn new(expander: RangeExpander) -> Self {
        Self { expander }
    }

    pub fn group(&self, segments: &[ClassifiedSegment]) -> GroupingOutcome {
        let mut outcome = GroupingOutcome::default();
        let mut acc = Accumulator::default();
        let mut last_street: Option<String> = None;

        for (index, segment) in segments.iter().enumerate() {
            let confidence = segment.classification.confidence;
            match &segment.classification.label {
                SegmentLabel::Street {
                    name,
                    attached_numbers,
                } => {
                    if acc.holds_only_orphans() {
                        // Leading numbers written before their street
                        acc.street = Some(name.clone());
                    } else {
                        if !acc.is_empty() {
                            self.emit(std::mem::take(&mut acc), segments, &mut outcome);
                        }
                        acc.street = Some(name.clone());
                    }
                    acc.tokens.extend(attached_numbers.iter().cloned());
                    acc.absorb(index, confidence);
                    last_street = Some(name.clone());
                }
                SegmentLabel::NumberList { numbers } => {
                    if acc.street.is_none() {
                        acc.street = last_street.clone();
                    }
                    acc.tokens.extend(numbers.iter().cloned());
                    acc.absorb(index, confidence);
                }
                SegmentLabel::PostalCity { postal_code, city } => {
                    if acc.holds_only_orphans() {
                        self.drop_orphans(std::mem::take(&mut acc), segments, &mut outcome);
                    }
                    acc.postal_code = Some(postal_code.clone());
                    acc.city = city.clone();
                    acc.absorb(index, confidence);
                    self.emit(std::mem::take(&mut acc), segments, &mut outcome);
                }
                SegmentLabel::Unknown => {}
            }
        }

        if acc.holds_only_orphans() {
            self.drop_orphans(acc, segments, &mut outcome);
        } else if !acc.is_empty() {
            self.emit(acc, segments, &mut outcome);
        }

        outcome
    }

    fn emit(&self, acc: Accumulator, segments: &[ClassifiedSegment], outcome: &mut GroupingOutcome) {
        debug_assert!(!acc.holds_only_orphans());

        let had_tokens = !acc.tokens.is_empty();
        let (literal, plain): (Vec<String>, Vec<String>) =
            acc.tokens.into_iter().partition(|t| is_zero_padded(t));
        let expansion = self.expander.expand(&plain);

        let mut confidence = acc.confidence.unwrap_or(0.0);
        for token in &expansion.malformed {
            confidence *= 0.5;
            outcome.diagnostics.push(Diagnostic::MalformedRange {
                token: token.clone(),
            });
        }

        // Numbers were written but none survived; this is not a whole street
        if had_tokens && expansion.numbers.is_empty() && literal.is_empty() {
            log::debug!("Dropping group {:?}: no usable house numbers", acc.street);
            return;
        }

        let group = ParsedGroup {
            street: acc.street,
            numbers: expansion.numbers,
            literal_numbers: literal.into_iter().collect(),
            postal_code: acc.postal_code,
            city: acc.city,
            confidence,
            segments: acc.segments,
        };
        log::trace!(
            "Emitting group {:?} with {} numbers from {} of {} segments",
            group.street,
            group.numbers.len(),
            group.segments.len(),
            segments.len()
        );
        outcome.groups.push(group);
    }

    fn drop_orphans(&self, acc: Accumulator, segments: &[ClassifiedSegment], outcome: &mut GroupingOutcome) {
        for index in acc.segments {
            if let Some(segment) = segments.get(index) {
                log::debug!("Dropping numbers without street '{}'", segment.text);
                outcome.diagnostics.push(Diagnostic::OrphanedNumbers {
                    text: segment.text.clone(),
                    offset: segment.offset,
                });
            }
        }
    }
}

/// Plain tokens such as "007"; ranges are always expanded numerically
fn is_zero_padded(token: &str) -> bool {
    token.len() > 1 && token.starts_with('0') && token.bytes().all(|b| b.is_ascii_digit())
}
