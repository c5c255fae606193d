//! House-number range expansion

use std::collections::BTreeSet;

/// Widest `A-B` span expanded into an interval
pub const DEFAULT_MAX_RANGE_SPAN: u32 = 1000;

/// Expanded numbers plus the tokens that had to be degraded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeExpansion {
    pub numbers: BTreeSet<u32>,
    pub malformed: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct RangeExpander {
    max_span: u32,
}

impl Default for RangeExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RANGE_SPAN)
    }
}

impl RangeExpander {
    pub fn new(max_span: u32) -> Self {
        Self { max_span }
    }

    /// Expand `A-B` tokens into closed intervals.
    ///
    /// Inverted or overly wide ranges keep both endpoints as discrete numbers
    /// and are listed in `malformed`, as are tokens that are not numeric.
    pub fn expand<I, S>(&self, tokens: I) -> RangeExpansion
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expansion = RangeExpansion::default();
        for token in tokens {
            self.expand_token(token.as_ref().trim(), &mut expansion);
        }
        expansion
    }

    fn expand_token(&self, token: &str, out: &mut RangeExpansion) {
        let Some((left, right)) = token.split_once(['-', '–', '—']) else {
            match token.parse::<u32>() {
                Ok(n) => {
                    out.numbers.insert(n);
                }
                Err(_) => degrade(token, out),
            }
            return;
        };

        match (left.trim().parse::<u32>(), right.trim().parse::<u32>()) {
            (Ok(a), Ok(b)) if a <= b && b - a <= self.max_span => {
                out.numbers.extend(a..=b);
            }
            (a, b) => {
                out.numbers.extend(a.ok());
                out.numbers.extend(b.ok());
                degrade(token, out);
            }
        }
    }
}

fn degrade(token: &str, out: &mut RangeExpansion) {
    log::debug!("Degrading malformed range token '{token}'");
    out.malformed.push(token.to_string());
}

/// Expand with the default span limit, discarding malformed-token details
pub fn expand_ranges<I, S>(tokens: I) -> BTreeSet<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RangeExpander::default().expand(tokens).numbers
}
