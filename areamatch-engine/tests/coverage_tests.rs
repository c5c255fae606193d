//! Coverage aggregation over craftsmen and properties

use areamatch_engine::*;

fn craftsmen() -> Vec<Craftsman> {
    vec![
        Craftsman::new(
            "Sanitär Meier",
            &["Sanitär"],
            &["Zürcherstr. 65 / 67 / 69 / 71", "Im Struppen 11-17, 19, 21"],
        ),
        Craftsman::new(
            "Elektro Huber",
            &["Elektro"],
            &["Badenerstr.717/Im Struppen 8, 8048 Zürich"],
        ),
        Craftsman::new("Maler Überall", &["Maler"], &[]),
        Craftsman::new(
            "Heizung Keller",
            &["Heizung", "Sanitär"],
            &["Baslerstr. 127/129/131/133"],
        ),
    ]
}

const CATEGORIES: &[&str] = &["Sanitär", "Elektro", "Maler", "Heizung"];

#[test]
fn test_fully_covered_property() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, &["Sanitär", "Maler"]);

    let coverage = analyzer.analyze_property("Zürcherstrasse 69, 8048 Zürich");
    assert_eq!(coverage.total_categories, 2);
    assert_eq!(coverage.covered_categories, 2);
    assert_eq!(coverage.coverage_percentage, 100.0);
    assert!(!coverage.has_gaps());

    let sanitary = &coverage.matches[0];
    assert_eq!(sanitary.craftsman, "Sanitär Meier");
    assert_eq!(sanitary.service_area.as_deref(), Some("Zürcherstr. 65 / 67 / 69 / 71"));
    assert_eq!(
        sanitary.result.as_ref().map(|r| r.reason),
        Some(MatchReason::StreetAndNumberInRange)
    );
}

#[test]
fn test_gap_lists_category_craftsmen() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, CATEGORIES);

    // 18 is not listed: 11-17, 19, 21
    let coverage = analyzer.analyze_property("Im Struppen 18");
    assert_eq!(coverage.covered_categories, 1);
    assert_eq!(coverage.coverage_percentage, 25.0);

    let sanitary = coverage.gaps.iter().find(|g| g.category == "Sanitär").unwrap();
    assert_eq!(sanitary.craftsmen, vec!["Sanitär Meier", "Heizung Keller"]);
    let electrical = coverage.gaps.iter().find(|g| g.category == "Elektro").unwrap();
    assert_eq!(electrical.craftsmen, vec!["Elektro Huber"]);
}

#[test]
fn test_category_nobody_offers() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, &["Dachdecker"]);
    let coverage = analyzer.analyze_property("Zürcherstrasse 69");
    assert_eq!(coverage.gaps.len(), 1);
    assert!(coverage.gaps[0].craftsmen.is_empty());
}

#[test]
fn test_property_range_served_by_any_number() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, &["Heizung"]);

    // Only 131 of 130-132 is listed
    let coverage = analyzer.analyze_property("Baslerstrasse 130-132");
    assert_eq!(coverage.covered_categories, 1);

    let coverage = analyzer.analyze_property("Baslerstrasse 134-136");
    assert_eq!(coverage.covered_categories, 0);
}

#[test]
fn test_no_categories() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let none: [&str; 0] = [];
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, &none);
    let coverage = analyzer.analyze_property("Zürcherstrasse 69");
    assert_eq!(coverage.total_categories, 0);
    assert_eq!(coverage.coverage_percentage, 0.0);
}

#[test]
fn test_summary() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, CATEGORIES);
    let properties = ["Zürcherstrasse 69", "Im Struppen 8", "Im Struppen 18"];

    let coverages = analyzer.analyze_all(&properties);
    assert_eq!(coverages.len(), 3);
    assert_eq!(coverages[0].property, "Zürcherstrasse 69");

    let summary = analyzer.summary(&coverages);
    assert_eq!(summary.total_properties, 3);
    assert_eq!(
        summary.properties_with_gaps + summary.properties_with_full_coverage,
        3
    );
    assert_eq!(
        summary.total_gaps,
        coverages.iter().map(|c| c.gaps.len()).sum::<usize>()
    );
    // Heizung is missing everywhere
    assert_eq!(summary.top_gaps[0].category, "Heizung");
    assert_eq!(summary.top_gaps[0].properties, 3);
    assert!(summary.top_gaps.len() <= 5);
    assert!(summary
        .top_gaps
        .windows(2)
        .all(|pair| pair[0].properties >= pair[1].properties));

    let expected_average =
        coverages.iter().map(|c| c.coverage_percentage).sum::<f64>() / 3.0;
    assert!((summary.average_coverage - expected_average).abs() < 1e-9);
}

#[test]
fn test_empty_summary() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, CATEGORIES);
    let summary = analyzer.summary(&[]);
    assert_eq!(summary.total_properties, 0);
    assert_eq!(summary.average_coverage, 0.0);
    assert!(summary.top_gaps.is_empty());
}

#[test]
fn test_unmatched_service_areas() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, CATEGORIES);

    let unmatched = analyzer.unmatched_service_areas(&["Zürcherstrasse 69", "Im Struppen 8"]);
    assert_eq!(
        unmatched.get("Baslerstr. 127/129/131/133"),
        Some(&vec!["Heizung Keller".to_string()])
    );
    assert_eq!(
        unmatched.get("Im Struppen 11-17, 19, 21"),
        Some(&vec!["Sanitär Meier".to_string()])
    );
    assert!(!unmatched.contains_key("Zürcherstr. 65 / 67 / 69 / 71"));
    assert!(!unmatched.contains_key("Badenerstr.717/Im Struppen 8, 8048 Zürich"));
}

#[test]
fn test_coverage_serializes() {
    let matcher = AreaMatcher::new().unwrap();
    let craftsmen = craftsmen();
    let analyzer = CoverageAnalyzer::new(&matcher, &craftsmen, &["Maler"]);
    let coverage = analyzer.analyze_property("Seestrasse 1");
    let json = serde_json::to_value(&coverage).unwrap();
    assert_eq!(json["covered_categories"], 1);
    assert_eq!(json["matches"][0]["craftsman"], "Maler Überall");
    assert!(json["matches"][0]["result"].is_null());
}

#[test]
fn test_craftsman_deserializes_without_areas() {
    let craftsman: Craftsman =
        serde_json::from_str(r#"{"name": "Maler AG", "categories": ["Maler"]}"#).unwrap();
    assert!(craftsman.service_areas.is_empty());
}
