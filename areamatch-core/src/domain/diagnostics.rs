//! Soft parse conditions reported back to the caller
//!
//! Nothing here aborts a parse. The engine collects these so a caller can log
//! unparsed service areas; it never logs or writes them itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default threshold below which a group is reported
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The input was empty or whitespace only
    EmptyInput,
    /// A segment classified as unknown and was excluded from matching
    UnparsableSegment { text: String, offset: usize },
    /// A range token was inverted, too wide or not numeric
    MalformedRange { token: String },
    /// Numbers with no street anywhere before or after them
    OrphanedNumbers { text: String, offset: usize },
    /// A postal code followed by more house numbers
    InterleavedPostalCode { text: String, offset: usize },
    /// A group whose confidence fell below the configured threshold
    LowConfidenceGroup { index: usize, confidence: f32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyInput => write!(f, "empty input"),
            Diagnostic::UnparsableSegment { text, offset } => {
                write!(f, "unparsable segment '{text}' at {offset}")
            }
            Diagnostic::MalformedRange { token } => write!(f, "malformed range '{token}'"),
            Diagnostic::OrphanedNumbers { text, offset } => {
                write!(f, "numbers without street '{text}' at {offset}")
            }
            Diagnostic::InterleavedPostalCode { text, offset } => {
                write!(f, "postal code inside number list '{text}' at {offset}")
            }
            Diagnostic::LowConfidenceGroup { index, confidence } => {
                write!(f, "group {index} has low confidence {confidence:.2}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::UnparsableSegment {
            text: "???".into(),
            offset: 4,
        };
        assert_eq!(d.to_string(), "unparsable segment '???' at 4");
        assert_eq!(Diagnostic::EmptyInput.to_string(), "empty input");
    }

    #[test]
    fn test_serialized_shape() {
        let d = Diagnostic::MalformedRange {
            token: "9-3".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "malformed_range");
        assert_eq!(json["token"], "9-3");
    }
}
