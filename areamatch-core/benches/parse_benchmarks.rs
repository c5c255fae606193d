//! Parse and match throughput
//!
//! Run with: cargo bench --bench parse_benchmarks

use std::hint::black_box;

use areamatch_core::{normalize, parse_area, AreaParser, Matcher, ParsedAddress};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SAMPLES: &[&str] = &[
    "Zürcherstr. 65 / 67 / 69 / 71",
    "Baslerstr. 127/129/131/133 / Calandastr. 16/18",
    "Im Struppen 11, 12, 13, 14, 15, 16, 17, 19, 21, 8048 Zürich",
    "Badenerstr.717/Im Struppen 8, 8048 Zürich",
    "Meierwiesenstr. 52-58\nHohlstrasse 10 / 12\n8004 Zürich",
];

/// Distinct letter-only street name for index `i`
fn street_name(i: usize) -> String {
    let letters: String = i
        .to_string()
        .bytes()
        .map(|d| char::from(b'a' + (d - b'0')))
        .collect();
    format!("Test{letters}strasse")
}

/// Generate a service area listing `streets` streets with a few numbers each
fn generate_area(streets: usize) -> String {
    (0..streets)
        .map(|i| format!("{} {}, {}, {}-{}", street_name(i), i + 1, i + 3, i + 5, i + 9))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("St. Galler-Strasse")));
    });
}

fn bench_parse_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_samples");
    let parser = AreaParser::new();

    for (i, sample) in SAMPLES.iter().enumerate() {
        group.throughput(Throughput::Bytes(sample.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", i), sample, |b, sample| {
            b.iter(|| parser.parse(black_box(sample)));
        });
    }

    group.finish();
}

fn bench_parse_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_scaling");

    for streets in [1, 10, 100] {
        let raw = generate_area(streets);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(streets), &raw, |b, raw| {
            b.iter(|| parse_area(black_box(raw)));
        });
    }

    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let area = parse_area(&generate_area(100));
    let matcher = Matcher::default();
    let hit = ParsedAddress::new(&street_name(99), Some(105), None);
    let miss = ParsedAddress::new("Seestrasse", Some(1), None);

    c.bench_function("match_hit", |b| {
        b.iter(|| matcher.match_area(black_box(&hit), &area));
    });
    c.bench_function("match_miss", |b| {
        b.iter(|| matcher.match_area(black_box(&miss), &area));
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_parse_samples,
    bench_parse_scaling,
    bench_match
);
criterion_main!(benches);
