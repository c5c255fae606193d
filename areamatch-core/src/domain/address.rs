//! Property addresses

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::classifier::number_tokens;
use crate::domain::normalizer::Normalizer;
use crate::domain::range::expand_ranges;

/// Postal code (and optional city) at the end of an address line
static POSTAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s,]+(\d{4,5})(?:\s+\p{L}[\p{L}\p{M}.'’\- ]*)?\s*$").unwrap()
});

static NUMBERS_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d[\d\s,/&+–—-]*?)\s+(\p{L}.*)$").unwrap());

/// A single property address reduced to street, number and postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    raw: String,
    street: String,
    number: Option<u32>,
    postal_code: Option<String>,
}

impl ParsedAddress {
    /// Build from already separated fields, normalizing with the default table
    pub fn new(street: &str, number: Option<u32>, postal_code: Option<&str>) -> Self {
        Self::with_normalizer(street, number, postal_code, &Normalizer::new())
    }

    pub fn with_normalizer(
        street: &str,
        number: Option<u32>,
        postal_code: Option<&str>,
        normalizer: &Normalizer,
    ) -> Self {
        let street_raw = street.trim();
        let raw = match number {
            Some(n) => format!("{street_raw} {n}"),
            None => street_raw.to_string(),
        };
        Self {
            raw,
            street: normalizer.normalize(street_raw),
            number,
            postal_code: postal_code
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }

    /// Parse a one-line property string such as `Calandastrasse 16, 8048 Zürich`.
    ///
    /// A number range or list keeps its lowest number; use
    /// [`ParsedAddress::parse_all`] for one address per number.
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, &Normalizer::new())
    }

    pub fn parse_with(raw: &str, normalizer: &Normalizer) -> Self {
        let parts = split_address(raw);
        let number = expand_ranges(number_tokens(parts.numbers)).into_iter().next();
        Self {
            raw: parts.head.to_string(),
            street: normalizer.normalize(parts.street),
            number,
            postal_code: parts.postal_code.map(str::to_string),
        }
    }

    /// Parse a property string, expanding `52-58` or `3/5` into one address
    /// per number.
    pub fn parse_all(raw: &str) -> Vec<Self> {
        Self::parse_all_with(raw, &Normalizer::new())
    }

    pub fn parse_all_with(raw: &str, normalizer: &Normalizer) -> Vec<Self> {
        let parts = split_address(raw);
        let numbers = expand_ranges(number_tokens(parts.numbers));
        if numbers.len() <= 1 {
            return vec![Self::parse_with(raw, normalizer)];
        }

        let street = normalizer.normalize(parts.street);
        let street_raw = parts.street.trim();
        numbers
            .into_iter()
            .map(|n| Self {
                raw: format!("{street_raw} {n}"),
                street: street.clone(),
                number: Some(n),
                postal_code: parts.postal_code.map(str::to_string),
            })
            .collect()
    }

    /// Address text as written, without postal code or city
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized street name
    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }
}

struct AddressParts<'a> {
    /// Street and numbers, postal tail removed
    head: &'a str,
    street: &'a str,
    numbers: &'a str,
    postal_code: Option<&'a str>,
}

fn split_address(raw: &str) -> AddressParts<'_> {
    let line = raw.trim();

    let (head, postal_code) = match POSTAL_SUFFIX.captures(line) {
        Some(caps) if caps.get(0).is_some_and(|m| m.start() > 0) => {
            let start = caps.get(0).map_or(line.len(), |m| m.start());
            (line[..start].trim(), caps.get(1).map(|m| m.as_str()))
        }
        _ => (line, None),
    };

    if let Some(caps) = NUMBERS_FIRST.captures(head) {
        if let (Some(numbers), Some(street)) = (caps.get(1), caps.get(2)) {
            return AddressParts {
                head,
                street: street.as_str(),
                numbers: numbers.as_str(),
                postal_code,
            };
        }
    }

    // House numbers start at the first digit that follows a letter
    let split = head
        .char_indices()
        .skip_while(|(_, c)| !c.is_alphabetic())
        .find(|(_, c)| c.is_ascii_digit())
        .map_or(head.len(), |(i, _)| i);

    AddressParts {
        head,
        street: head[..split].trim_end_matches(|c: char| c.is_whitespace() || c == ','),
        numbers: &head[split..],
        postal_code,
    }
}
