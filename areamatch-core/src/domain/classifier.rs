//! Segment classification
//!
//! An ordered rule list evaluated top-down; the first rule that accepts a
//! segment decides its label. A second pass over the whole sequence fixes
//! up postal codes whose meaning depends on their neighbours.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::delimiter::Segment;
use crate::domain::diagnostics::Diagnostic;
use crate::domain::normalizer::Normalizer;
use crate::types::{Classification, ClassifiedSegment, SegmentLabel};

static POSTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4,5})(?:\s+(\p{Lu}[\p{L}\p{M}.'’\- ]*))?$").unwrap()
});

static ALL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

static NUMBER_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[\d\s,/;&+.–—-]*$").unwrap());

static STREET_THEN_NUMBERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{L}[\p{L}\p{M}.'’\- ]*?)[\s.]*(\d[\d\s,/;&+–—-]*)$").unwrap()
});

static NUMBERS_THEN_STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d[\d\s,/;&+–—-]*?)\s+(\p{L}[\p{L}\p{M}.'’\- ]*)$").unwrap()
});

static STREET_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}\p{M}.'’\- ]*$").unwrap());

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\s*[-–—]\s*(\d+))?").unwrap());

/// Confidence of a postal-shaped number reinterpreted as a house number
const DEMOTED_POSTAL_CONFIDENCE: f32 = 0.6;

/// Extract number tokens as `"a"` or `"a-b"`
pub(crate) fn number_tokens(text: &str) -> Vec<String> {
    NUMBER_TOKEN
        .captures_iter(text)
        .map(|caps| match (caps.get(1), caps.get(2)) {
            (Some(a), Some(b)) => format!("{}-{}", a.as_str(), b.as_str()),
            (Some(a), None) => a.as_str().to_string(),
            _ => String::new(),
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// A single classification rule
#[derive(Clone, Copy)]
pub struct ClassifierRule {
    pub name: &'static str,
    apply: fn(&str, &Normalizer) -> Option<Classification>,
}

impl std::fmt::Debug for ClassifierRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRule")
            .field("name", &self.name)
            .finish()
    }
}

fn postal_rule(text: &str, _: &Normalizer) -> Option<Classification> {
    let caps = POSTAL.captures(text)?;
    let city = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|c| !c.is_empty());
    Some(Classification::new(
        SegmentLabel::PostalCity {
            postal_code: caps[1].to_string(),
            city,
        },
        0.95,
    ))
}

fn single_number_rule(text: &str, _: &Normalizer) -> Option<Classification> {
    ALL_DIGITS.is_match(text).then(|| {
        Classification::new(
            SegmentLabel::NumberList {
                numbers: vec![text.to_string()],
            },
            1.0,
        )
    })
}

fn number_list_rule(text: &str, _: &Normalizer) -> Option<Classification> {
    if !NUMBER_LIST.is_match(text) {
        return None;
    }
    let numbers = number_tokens(text);
    (!numbers.is_empty()).then(|| Classification::new(SegmentLabel::NumberList { numbers }, 0.9))
}

fn street_with_numbers_rule(text: &str, normalizer: &Normalizer) -> Option<Classification> {
    let (street, numbers) = if let Some(caps) = STREET_THEN_NUMBERS.captures(text) {
        (caps.get(1)?.as_str(), caps.get(2)?.as_str())
    } else {
        let caps = NUMBERS_THEN_STREET.captures(text)?;
        (caps.get(2)?.as_str(), caps.get(1)?.as_str())
    };

    let name = normalizer.normalize(street);
    let attached_numbers = number_tokens(numbers);
    if name.is_empty() || attached_numbers.is_empty() {
        return None;
    }
    Some(Classification::new(
        SegmentLabel::Street {
            name,
            attached_numbers,
        },
        0.8,
    ))
}

fn street_rule(text: &str, normalizer: &Normalizer) -> Option<Classification> {
    if !STREET_ONLY.is_match(text) {
        return None;
    }
    let name = normalizer.normalize(text);
    (!name.is_empty()).then(|| {
        Classification::new(
            SegmentLabel::Street {
                name,
                attached_numbers: Vec::new(),
            },
            0.9,
        )
    })
}

/// Rules in evaluation order
pub const DEFAULT_RULES: &[ClassifierRule] = &[
    ClassifierRule {
        name: "postal_code",
        apply: postal_rule,
    },
    ClassifierRule {
        name: "single_number",
        apply: single_number_rule,
    },
    ClassifierRule {
        name: "number_list",
        apply: number_list_rule,
    },
    ClassifierRule {
        name: "street_with_numbers",
        apply: street_with_numbers_rule,
    },
    ClassifierRule {
        name: "street",
        apply: street_rule,
    },
];

/// Classify with the default alias table
pub fn classify(segment: &str) -> Classification {
    SegmentClassifier::default().classify(segment)
}

#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    normalizer: Normalizer,
    rules: &'static [ClassifierRule],
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::new(Normalizer::new())
    }
}

impl SegmentClassifier {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            rules: DEFAULT_RULES,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Label a single segment in isolation
    pub fn classify(&self, segment: &str) -> Classification {
        let text = segment.trim();
        if text.is_empty() {
            return Classification::unknown();
        }
        self.rules
            .iter()
            .find_map(|rule| (rule.apply)(text, &self.normalizer))
            .unwrap_or_else(Classification::unknown)
    }

    /// Classify a sequence and resolve postal codes by context.
    ///
    /// A bare 4-5 digit number after a numbered segment is a house number.
    /// A postal code followed by more numbers is interleaved and becomes
    /// unknown. Unknown segments are reported as diagnostics.
    pub fn classify_sequence<'a, I>(&self, segments: I) -> (Vec<ClassifiedSegment>, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let classified = segments
            .into_iter()
            .map(|(text, offset)| ClassifiedSegment {
                text: text.to_string(),
                offset,
                classification: self.classify(text),
            })
            .collect();
        resolve_context(classified)
    }

    /// Classify segments produced by the delimiter scorer.
    ///
    /// A loose word run left over by a whitespace split is unknown rather
    /// than a bare street, so it cannot declare a whole street.
    pub fn classify_segments(
        &self,
        segments: &[Segment<'_>],
    ) -> (Vec<ClassifiedSegment>, Vec<Diagnostic>) {
        let classified = segments
            .iter()
            .map(|segment| {
                let mut classification = self.classify(segment.text);
                let bare_street = matches!(
                    &classification.label,
                    SegmentLabel::Street { attached_numbers, .. } if attached_numbers.is_empty()
                );
                if segment.loose && bare_street {
                    classification = Classification::unknown();
                }
                ClassifiedSegment {
                    text: segment.text.to_string(),
                    offset: segment.offset,
                    classification,
                }
            })
            .collect();
        resolve_context(classified)
    }
}

/// Reinterpret postal codes by their neighbours and report unknowns
fn resolve_context(
    mut classified: Vec<ClassifiedSegment>,
) -> (Vec<ClassifiedSegment>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    for i in 0..classified.len() {
        let demote = match &classified[i].classification.label {
            SegmentLabel::PostalCity {
                postal_code,
                city: None,
            } => previous_known(&classified, i)
                .filter(|prev| prev.classification.label.carries_numbers())
                .map(|_| postal_code.clone()),
            _ => None,
        };
        if let Some(code) = demote {
            classified[i].classification = Classification::new(
                SegmentLabel::NumberList {
                    numbers: vec![code],
                },
                DEMOTED_POSTAL_CONFIDENCE,
            );
        }
    }

    for i in 0..classified.len() {
        let interleaved = matches!(
            classified[i].classification.label,
            SegmentLabel::PostalCity { city: Some(_), .. }
        ) && next_known(&classified, i).is_some_and(|next| {
            matches!(next.classification.label, SegmentLabel::NumberList { .. })
        });

        if interleaved {
            let segment = &mut classified[i];
            log::debug!("Postal code '{}' interleaved in number list", segment.text);
            segment.classification = Classification::unknown();
            diagnostics.push(Diagnostic::InterleavedPostalCode {
                text: segment.text.clone(),
                offset: segment.offset,
            });
        } else if classified[i].classification.label.is_unknown() {
            let segment = &classified[i];
            log::debug!("Unparsable segment '{}' at {}", segment.text, segment.offset);
            diagnostics.push(Diagnostic::UnparsableSegment {
                text: segment.text.clone(),
                offset: segment.offset,
            });
        }
    }

    (classified, diagnostics)
}

fn previous_known(segments: &[ClassifiedSegment], i: usize) -> Option<&ClassifiedSegment> {
    segments[..i]
        .iter()
        .rev()
        .find(|s| !s.classification.label.is_unknown())
}

fn next_known(segments: &[ClassifiedSegment], i: usize) -> Option<&ClassifiedSegment> {
    segments[i + 1..]
        .iter()
        .find(|s| !s.classification.label.is_unknown())
}
