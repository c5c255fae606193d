//! Craftsman coverage aggregation
//!
//! For every property and category, decides whether some craftsman of the
//! category serves the property, and rolls the answers up into gaps and a
//! summary. Report rendering is left to callers; every type here is
//! `Serialize`.

use std::collections::{BTreeMap, HashMap};

use areamatch_core::{MatchResult, ParsedAddress};
use serde::{Deserialize, Serialize};

use crate::processor::AreaMatcher;

/// Number of categories listed in [`CoverageSummary::top_gaps`]
const TOP_GAPS: usize = 5;

/// A craftsman with their trades and free-text service areas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craftsman {
    /// Display name
    pub name: String,
    /// Trades offered
    pub categories: Vec<String>,
    /// Service-area cells; empty means the craftsman serves everywhere
    #[serde(default)]
    pub service_areas: Vec<String>,
}

impl Craftsman {
    /// Create a craftsman
    pub fn new<S: Into<String>>(name: S, categories: &[&str], service_areas: &[&str]) -> Self {
        Self {
            name: name.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            service_areas: service_areas.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Whether this craftsman offers `category` (case-insensitive)
    pub fn offers(&self, category: &str) -> bool {
        let category = category.trim().to_lowercase();
        self.categories
            .iter()
            .any(|c| c.trim().to_lowercase() == category)
    }
}

/// A category nobody serves for a property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGap {
    /// Missing category
    pub category: String,
    /// Craftsmen of the category, none of whom serves the property
    pub craftsmen: Vec<String>,
}

/// The craftsman covering a category for a property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMatch {
    /// Covered category
    pub category: String,
    /// Craftsman that covers it
    pub craftsman: String,
    /// Service-area text that matched, `None` for a craftsman without areas
    pub service_area: Option<String>,
    /// Winning verdict, `None` for a craftsman without areas
    pub result: Option<MatchResult>,
}

/// Coverage of one property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyCoverage {
    /// Property string as given
    pub property: String,
    /// Categories with at least one serving craftsman
    pub covered_categories: usize,
    /// Categories analyzed
    pub total_categories: usize,
    /// `covered / total * 100`, 0 when no categories are analyzed
    pub coverage_percentage: f64,
    /// Categories nobody serves
    pub gaps: Vec<CategoryGap>,
    /// Winning craftsman per covered category
    pub matches: Vec<CategoryMatch>,
}

impl PropertyCoverage {
    /// Whether any category is missing
    pub fn has_gaps(&self) -> bool {
        !self.gaps.is_empty()
    }
}

/// How often a category is missing across properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapCount {
    /// Category name
    pub category: String,
    /// Properties lacking it
    pub properties: usize,
}

/// Aggregate over all analyzed properties
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Properties analyzed
    pub total_properties: usize,
    /// Properties with at least one gap
    pub properties_with_gaps: usize,
    /// Properties without gaps
    pub properties_with_full_coverage: usize,
    /// Sum of gaps over all properties
    pub total_gaps: usize,
    /// Mean coverage percentage, 0 for no properties
    pub average_coverage: f64,
    /// Categories missing most often, most frequent first
    pub top_gaps: Vec<GapCount>,
}

/// Computes category coverage for properties
#[derive(Debug)]
pub struct CoverageAnalyzer<'a> {
    matcher: &'a AreaMatcher,
    craftsmen: &'a [Craftsman],
    categories: Vec<String>,
}

impl<'a> CoverageAnalyzer<'a> {
    /// Analyze `categories` against `craftsmen` using `matcher`
    pub fn new<S: AsRef<str>>(
        matcher: &'a AreaMatcher,
        craftsmen: &'a [Craftsman],
        categories: &[S],
    ) -> Self {
        Self {
            matcher,
            craftsmen,
            categories: categories
                .iter()
                .map(|c| c.as_ref().trim().to_string())
                .collect(),
        }
    }

    /// Coverage of a single property string
    pub fn analyze_property(&self, property: &str) -> PropertyCoverage {
        let addresses = self.matcher.parse_addresses(property);
        let mut gaps = Vec::new();
        let mut matches = Vec::new();

        for category in &self.categories {
            let offering: Vec<&Craftsman> =
                self.craftsmen.iter().filter(|c| c.offers(category)).collect();

            let best = offering
                .iter()
                .filter_map(|craftsman| self.serves(craftsman, category, &addresses))
                .reduce(|best, candidate| {
                    if confidence(&candidate) > confidence(&best) {
                        candidate
                    } else {
                        best
                    }
                });

            match best {
                Some(found) => matches.push(found),
                None => gaps.push(CategoryGap {
                    category: category.clone(),
                    craftsmen: offering.iter().map(|c| c.name.clone()).collect(),
                }),
            }
        }

        let total = self.categories.len();
        let covered = matches.len();
        PropertyCoverage {
            property: property.to_string(),
            covered_categories: covered,
            total_categories: total,
            coverage_percentage: percentage(covered, total),
            gaps,
            matches,
        }
    }

    /// Coverage of every property, in input order
    pub fn analyze_all<S: AsRef<str>>(&self, properties: &[S]) -> Vec<PropertyCoverage> {
        log::info!(
            "Analyzing {} properties across {} categories and {} craftsmen",
            properties.len(),
            self.categories.len(),
            self.craftsmen.len()
        );
        let coverages: Vec<PropertyCoverage> = properties
            .iter()
            .map(|p| self.analyze_property(p.as_ref()))
            .collect();

        if let Some(stats) = self.matcher.cache_stats() {
            log::info!(
                "Parsed {} distinct service areas ({} cache hits)",
                stats.entries,
                stats.hits
            );
        }
        coverages
    }

    /// Roll per-property coverage up into totals
    pub fn summary(&self, coverages: &[PropertyCoverage]) -> CoverageSummary {
        let properties_with_gaps = coverages.iter().filter(|c| c.has_gaps()).count();
        let total_gaps = coverages.iter().map(|c| c.gaps.len()).sum();
        let average_coverage = if coverages.is_empty() {
            0.0
        } else {
            coverages.iter().map(|c| c.coverage_percentage).sum::<f64>() / coverages.len() as f64
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for gap in coverages.iter().flat_map(|c| &c.gaps) {
            *counts.entry(gap.category.as_str()).or_default() += 1;
        }
        let mut top_gaps: Vec<GapCount> = counts
            .into_iter()
            .map(|(category, properties)| GapCount {
                category: category.to_string(),
                properties,
            })
            .collect();
        top_gaps.sort_by(|a, b| {
            b.properties
                .cmp(&a.properties)
                .then_with(|| a.category.cmp(&b.category))
        });
        top_gaps.truncate(TOP_GAPS);

        CoverageSummary {
            total_properties: coverages.len(),
            properties_with_gaps,
            properties_with_full_coverage: coverages.len() - properties_with_gaps,
            total_gaps,
            average_coverage,
            top_gaps,
        }
    }

    /// Service areas that matched none of `properties`, with the craftsmen
    /// listing them
    pub fn unmatched_service_areas<S: AsRef<str>>(
        &self,
        properties: &[S],
    ) -> BTreeMap<String, Vec<String>> {
        let addresses: Vec<ParsedAddress> = properties
            .iter()
            .flat_map(|p| self.matcher.parse_addresses(p.as_ref()))
            .collect();

        let mut unmatched: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for craftsman in self.craftsmen {
            for area in &craftsman.service_areas {
                let hit = addresses
                    .iter()
                    .any(|address| self.matcher.match_address(address, area).matched);
                if !hit {
                    let names = unmatched.entry(area.clone()).or_default();
                    if !names.contains(&craftsman.name) {
                        names.push(craftsman.name.clone());
                    }
                }
            }
        }
        unmatched
    }

    /// Best matching service area of `craftsman` for any of `addresses`
    fn serves(
        &self,
        craftsman: &Craftsman,
        category: &str,
        addresses: &[ParsedAddress],
    ) -> Option<CategoryMatch> {
        if craftsman.service_areas.is_empty() {
            return Some(CategoryMatch {
                category: category.to_string(),
                craftsman: craftsman.name.clone(),
                service_area: None,
                result: None,
            });
        }

        let mut best: Option<(&String, MatchResult)> = None;
        for area in &craftsman.service_areas {
            for address in addresses {
                let result = self.matcher.match_address(address, area);
                if !result.matched {
                    continue;
                }
                let better = best
                    .as_ref()
                    .map_or(true, |(_, current)| result.confidence > current.confidence);
                if better {
                    best = Some((area, result));
                }
            }
        }

        best.map(|(area, result)| CategoryMatch {
            category: category.to_string(),
            craftsman: craftsman.name.clone(),
            service_area: Some(area.clone()),
            result: Some(result),
        })
    }
}

/// Craftsmen without service areas rank as certain
fn confidence(found: &CategoryMatch) -> f32 {
    found.result.as_ref().map_or(1.0, |r| r.confidence)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
