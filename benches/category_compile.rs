//! Benchmarks for category compilation and requirement classification.
//!
//! Benchmark targets:
//! - Cold compile of a wide category tree: <1ms for 100 children
//! - Cached lookup: <1us
//! - Classifying a 20-requirement program: <1ms

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use dxnorm::io::InMemoryCategories;
use dxnorm::models::{CategoryItem, RawCategory, RawRequirement, RequisiteItem};
use dxnorm::{CategoryCompiler, RequirementClassifier};

const DEPARTMENTS: &[&str] = &["CSC", "MAT", "STA", "PHY", "CHM", "BIO", "ECO", "PHL", "ENG", "HIS"];

/// A root category including `width` child categories, each a department
/// wildcard minus one course.
fn wide_tree(width: usize) -> InMemoryCategories {
    let mut records = Vec::with_capacity(width + 1);
    let mut root_items = Vec::with_capacity(width);
    for i in 0..width {
        let dept = DEPARTMENTS[i % DEPARTMENTS.len()];
        let code = format!("{dept}-GROUP-{i}");
        root_items.push(CategoryItem::category(code.clone()));
        records.push(RawCategory {
            code,
            include_items: vec![CategoryItem::terminal(format!("{dept}*"))],
            exclude_items: vec![CategoryItem::terminal(format!("{dept}100H1"))],
            ..RawCategory::default()
        });
    }
    records.push(RawCategory {
        code: "ROOT".to_string(),
        include_items: root_items,
        ..RawCategory::default()
    });
    InMemoryCategories::from_records(records)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("category_compile");
    group.measurement_time(Duration::from_secs(5));

    for width in [10_usize, 100, 1000] {
        let store = wide_tree(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::new("cold", width), &store, |b, store| {
            b.iter(|| {
                let mut compiler = CategoryCompiler::new(store);
                black_box(compiler.compile(black_box("ROOT")))
            });
        });
    }

    let store = wide_tree(100);
    let mut compiler = CategoryCompiler::new(&store);
    compiler.compile("ROOT");
    group.bench_function("cached", |b| {
        b.iter(|| black_box(compiler.compile(black_box("ROOT"))));
    });

    group.finish();
}

fn program_nodes(count: usize) -> Vec<(String, RawRequirement)> {
    (0..count)
        .map(|i| {
            let raw = RawRequirement {
                kind: if i % 5 == 4 { "GROUPMINIMUM" } else { "MINIMUM" }.to_string(),
                count_type: "COURSES".to_string(),
                count: Some(1.0),
                display_prefix: format!("1.0 credit from Req{}", i.saturating_sub(1)),
                sub_item_connector_string: "or".to_string(),
                display_suffix: String::new(),
                requisite_items: vec![
                    RequisiteItem("CSC236H1".to_string()),
                    RequisiteItem("MAT*".to_string()),
                ],
            };
            (format!("Req{i}"), raw)
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("requirement_classify");
    let classifier = RequirementClassifier::new();

    for count in [5_usize, 20, 100] {
        let nodes = program_nodes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("program", count), &nodes, |b, nodes| {
            b.iter(|| classifier.classify_all(black_box("ASMAJ1689"), black_box(nodes)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_classify);
criterion_main!(benches);
