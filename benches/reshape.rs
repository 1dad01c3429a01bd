//! This bench test reshapes synthetic record sets: growing a flat,
//! parent-linked set into a forest, flattening it back, and nesting a wide
//! record of delimiter-encoded keys.

#![allow(missing_docs)]

use arbor::{GrowOptions, NestOptions, Record, TreeFields, Value, transform};
use criterion::{Criterion, criterion_group, criterion_main};

/// Generates `count` records shaped like a binary tree: record `n` points at
/// record `n / 2`.
fn flat_records(count: i64) -> Vec<Record> {
    (1..=count)
        .map(|id| {
            let mut record = Record::with_capacity(3);
            record.insert("id", Value::from(id));
            record.insert("title", Value::from(format!("record {id}")));
            if id > 1 {
                record.insert("parent", Value::from(id / 2));
            }
            record
        })
        .collect()
}

fn reshape_trees(c: &mut Criterion) {
    let fields = TreeFields::parse("id", "parent", "children").unwrap();
    let options = GrowOptions::default();

    let flat = flat_records(1000);
    c.bench_function("grow 1000 records", |b| {
        b.iter(|| transform::grow(&flat, &fields, &options).unwrap());
    });

    let forest = transform::grow(&flat, &fields, &options).unwrap();
    c.bench_function("flatten 1000 records", |b| {
        b.iter(|| transform::flatten(&forest, &fields));
    });
}

fn nest_wide_record(c: &mut Criterion) {
    let record: Record = (0..1000)
        .map(|i| {
            (
                format!("group{}:sub{}:field{i}", i % 10, i % 100),
                Value::from(i),
            )
        })
        .collect();
    let options = NestOptions::default();

    c.bench_function("nest 1000 keys", |b| {
        b.iter(|| transform::nest(&record, &options));
    });
}

criterion_group!(benches, reshape_trees, nest_wide_record);
criterion_main!(benches);
