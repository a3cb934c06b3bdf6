use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use stockdesk_catalog::{
    CategoryPrefixMap, InventorySnapshot, Price, ProductRecord, RecordDate, Sku, generate_sku,
};

const CATEGORIES: [&str; 4] = ["כללי", "מזון", "משקאות", "ציוד"];

fn snapshot_of(size: usize) -> InventorySnapshot {
    let records = (0..size)
        .map(|i| ProductRecord {
            sku: Sku::new(format!("{i}")),
            name: format!("product {i}"),
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            price: Price::from_minor((i as u64) * 7),
            added_by: "User".to_string(),
            date: RecordDate::parse("01/01/2026"),
        })
        .collect();
    InventorySnapshot::new(records, Utc::now())
}

fn bench_generate_sku(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_sku");
    let prefixes = CategoryPrefixMap::standard();

    for size in [100usize, 1_000, 10_000] {
        let snapshot = snapshot_of(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snap| {
            b.iter(|| generate_sku(black_box(snap.records()), black_box("מזון"), &prefixes))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_search");

    for size in [100usize, 1_000, 10_000] {
        let snapshot = snapshot_of(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snap| {
            b.iter(|| snap.filter(black_box("PRODUCT 99")).len())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate_sku, bench_search);
criterion_main!(benches);
