//! Address-to-service-area matching
//!
//! Rules are tried in priority order. Each rule is checked against every
//! group before the next, weaker rule is considered, so a weak hit on an
//! early group never hides a strong hit on a later one.

use crate::domain::address::ParsedAddress;
use crate::domain::normalizer::Normalizer;
use crate::types::{MatchReason, MatchResult, ParsedArea, ParsedGroup};

/// Shortest compacted street name the fallback rule will compare
const MIN_FALLBACK_LEN: usize = 4;

/// Match against a parsed area with the default alias table
pub fn match_address(address: &ParsedAddress, area: &ParsedArea) -> MatchResult {
    Matcher::default().match_area(address, area)
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    normalizer: Normalizer,
}

impl Matcher {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn match_area(&self, address: &ParsedAddress, area: &ParsedArea) -> MatchResult {
        self.match_groups(address, &area.raw, &area.groups)
    }

    /// Run the cascade against the groups parsed from `raw_area`
    pub fn match_groups(
        &self,
        address: &ParsedAddress,
        raw_area: &str,
        groups: &[ParsedGroup],
    ) -> MatchResult {
        debug_assert!(
            groups.iter().all(|g| !g.is_orphaned()),
            "orphaned number group reached the matcher"
        );

        let street = self.normalizer.normalize(address.street());

        if contains_bounded(raw_area, address.raw()) {
            let group = groups.iter().find(|g| g.street.as_deref() == Some(street.as_str()));
            return MatchResult::hit(MatchReason::ExactAddressSubstring, group);
        }

        let candidates = || groups.iter().filter(|g| postal_compatible(address, g));

        if let Some(group) = candidates().find(|g| street_and_number(&street, address, g)) {
            return MatchResult::hit(MatchReason::StreetAndNumberInRange, Some(group));
        }
        if let Some(group) = candidates().find(|g| literal_number(&street, address, g)) {
            return MatchResult::hit(MatchReason::NormalizedStreetAndNumber, Some(group));
        }
        if let Some(group) = candidates().find(|g| relaxed_street(&street, address, g)) {
            return MatchResult::hit(MatchReason::AdaptivePatternFallback, Some(group));
        }

        MatchResult::no_match()
    }
}

/// `needle` occurs in `haystack` with no letter or digit touching either end
fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.trim().is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn postal_compatible(address: &ParsedAddress, group: &ParsedGroup) -> bool {
    match (address.postal_code(), group.postal_code.as_deref()) {
        (Some(a), Some(g)) => a == g,
        _ => true,
    }
}

fn street_and_number(street: &str, address: &ParsedAddress, group: &ParsedGroup) -> bool {
    match &group.street {
        Some(group_street) if group_street == street => {
            group.is_whole_street() || address.number().is_some_and(|n| group.numbers.contains(&n))
        }
        Some(_) => false,
        // Postal-code-only group
        None => group.postal_code.is_some() && address.postal_code() == group.postal_code.as_deref(),
    }
}

fn strip_zeros(token: &str) -> &str {
    let stripped = token.trim_start_matches('0');
    if stripped.is_empty() && !token.is_empty() {
        "0"
    } else {
        stripped
    }
}

fn literal_number(street: &str, address: &ParsedAddress, group: &ParsedGroup) -> bool {
    let Some(number) = address.number() else {
        return false;
    };
    let number = number.to_string();
    group.street.as_deref() == Some(street)
        && group
            .literal_numbers
            .iter()
            .any(|lit| strip_zeros(lit) == number)
}

fn compact(street: &str) -> String {
    street
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '–' | '—'))
        .collect()
}

fn relaxed_street(street: &str, address: &ParsedAddress, group: &ParsedGroup) -> bool {
    let (Some(group_street), Some(number)) = (group.street.as_deref(), address.number()) else {
        return false;
    };
    let number_hit = group.numbers.contains(&number)
        || group
            .literal_numbers
            .iter()
            .any(|lit| strip_zeros(lit) == number.to_string());
    if !number_hit {
        return false;
    }

    let a = compact(street);
    let b = compact(group_street);
    if a.chars().count() < MIN_FALLBACK_LEN || b.chars().count() < MIN_FALLBACK_LEN {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}
