//! Property-based tests for normalization, range expansion and grouping.
//!
//! 1. **Idempotence**: normalize(normalize(s)) == normalize(s)
//! 2. **Alias equivalence**: every variant normalizes like its canonical
//! 3. **Range expansion**: `A-B` is the closed interval, inverted ranges keep endpoints
//! 4. **Grouping completeness**: every recognized segment lands in a group

use std::collections::BTreeSet;

use areamatch_core::aliases::{get_table, AliasConfig};
use areamatch_core::{expand_ranges, normalize, parse_area, Normalizer, ParsedAddress};
use areamatch_core::{match_address, MatchReason};
use proptest::prelude::*;

const SWISS_GERMAN: &str = include_str!("../configs/aliases/swiss_german.toml");
const ENGLISH: &str = include_str!("../configs/aliases/english.toml");

fn arb_messy_name() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        prop::string::string_regex("[A-Za-zÄÖÜäöüßé]{1,8}").unwrap(),
        Just("strasse".to_string()),
        Just("Str.".to_string()),
        Just("Straße".to_string()),
        Just("St.".to_string()),
        Just("platz".to_string()),
        Just("-".to_string()),
        Just(".".to_string()),
        Just(", ".to_string()),
        Just("  ".to_string()),
        Just("(".to_string()),
        Just("'".to_string()),
        Just("–".to_string()),
    ];
    prop::collection::vec(fragment, 0..8).prop_map(|parts| parts.join(" "))
}

fn arb_glued_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-zäöü.\\- ]{0,24}").unwrap()
}

fn arb_stem() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-zäöü]{3,9}").unwrap()
}

fn arb_number() -> impl Strategy<Value = u32> {
    1u32..=999
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalize_is_idempotent(s in arb_messy_name()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone(), "input {:?}", s);
    }

    #[test]
    fn normalize_is_idempotent_without_spaces_between_fragments(s in arb_glued_name()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone(), "input {:?}", s);
    }

    #[test]
    fn english_normalize_is_idempotent(s in arb_messy_name()) {
        let normalizer = Normalizer::with_table(get_table("en-US").unwrap());
        let once = normalizer.normalize(&s);
        prop_assert_eq!(normalizer.normalize(&once), once.clone());
    }

    #[test]
    fn normalize_has_no_edge_noise(s in arb_messy_name()) {
        let out = normalize(&s);
        prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.to_lowercase(), out.clone());
    }

    #[test]
    fn swiss_german_aliases_are_equivalent(stem in arb_stem()) {
        let config: AliasConfig = toml::from_str(SWISS_GERMAN).unwrap();
        for suffix in &config.suffixes {
            let canonical = normalize(&format!("{stem}{}", suffix.canonical));
            for variant in &suffix.variants {
                prop_assert_eq!(&normalize(&format!("{stem}{variant}")), &canonical);
                prop_assert_eq!(&normalize(&format!("{stem} {variant}")), &canonical);
            }
        }
        for prefix in &config.prefixes {
            let canonical = normalize(&format!("{} {stem}", prefix.canonical));
            for variant in &prefix.variants {
                prop_assert_eq!(&normalize(&format!("{variant} {stem}")), &canonical);
            }
        }
    }

    #[test]
    fn english_aliases_are_equivalent(stem in arb_stem()) {
        let config: AliasConfig = toml::from_str(ENGLISH).unwrap();
        let normalizer = Normalizer::with_table(get_table("en-US").unwrap());
        for suffix in &config.suffixes {
            let canonical = normalizer.normalize(&format!("{stem} {}", suffix.canonical));
            for variant in &suffix.variants {
                prop_assert_eq!(&normalizer.normalize(&format!("{stem} {variant}")), &canonical);
            }
        }
        for prefix in &config.prefixes {
            let canonical = normalizer.normalize(&format!("{} {stem}", prefix.canonical));
            for variant in &prefix.variants {
                prop_assert_eq!(&normalizer.normalize(&format!("{variant} {stem}")), &canonical);
            }
        }
    }

    #[test]
    fn range_expands_to_interval(a in 0u32..500, len in 0u32..50) {
        let b = a + len;
        let expected: BTreeSet<u32> = (a..=b).collect();
        prop_assert_eq!(expand_ranges([format!("{a}-{b}")]), expected);
    }

    #[test]
    fn inverted_range_keeps_endpoints(a in 1u32..500, gap in 1u32..50) {
        let b = a + gap;
        let expected: BTreeSet<u32> = [a, b].into_iter().collect();
        prop_assert_eq!(expand_ranges([format!("{b}-{a}")]), expected);
    }

    #[test]
    fn grouping_covers_every_recognized_segment(
        streets in prop::collection::vec(
            (arb_stem(), prop::collection::vec(arb_number(), 1..5)),
            1..4,
        )
    ) {
        let raw = streets
            .iter()
            .map(|(stem, numbers)| {
                let numbers: Vec<String> = numbers.iter().map(u32::to_string).collect();
                format!("{stem}strasse {}", numbers.join(", "))
            })
            .collect::<Vec<_>>()
            .join(" / ");

        let area = parse_area(&raw);
        prop_assert!(!area.groups.is_empty());

        let covered: BTreeSet<usize> = area
            .groups
            .iter()
            .flat_map(|g| g.segments.iter().copied())
            .collect();
        for (index, segment) in area.segments.iter().enumerate() {
            if !segment.classification.label.is_unknown() {
                prop_assert!(covered.contains(&index), "segment {:?} not grouped in {:?}", segment.text, raw);
            }
        }

        let expected: BTreeSet<u32> = streets.iter().flat_map(|(_, n)| n.iter().copied()).collect();
        let parsed: BTreeSet<u32> = area.groups.iter().flat_map(|g| g.numbers.iter().copied()).collect();
        prop_assert_eq!(parsed, expected);
        prop_assert!(area.groups.iter().all(|g| !g.is_orphaned()));
    }

    #[test]
    fn exact_substring_always_wins(stem in arb_stem(), number in arb_number(), other in arb_number()) {
        let address = ParsedAddress::new(&format!("{stem}strasse"), Some(number), None);
        let raw = format!("Seestrasse {other} / {}", address.raw());
        let result = match_address(&address, &parse_area(&raw));
        prop_assert_eq!(result.reason, MatchReason::ExactAddressSubstring);
        prop_assert_eq!(result.confidence, 1.0);
    }
}
