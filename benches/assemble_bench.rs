//! Benchmarks for result assembly
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pricevault::retrieval::{concat_tables, parse_timestamp, ResolvedRange, ResultAssembler, Row, Table};
use serde_json::{json, Value};

fn create_tables(files: usize, rows_per_file: usize) -> Vec<Table> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
    (0..files)
        .map(|f| {
            let rows = (0..rows_per_file)
                .map(|i| {
                    let ts = start + Duration::minutes((f * rows_per_file + i) as i64);
                    let mut row = Row::new();
                    row.insert("timestamp".to_string(), json!(ts.to_rfc3339()));
                    row.insert("close".to_string(), json!(100.0 + i as f64));
                    row.insert("volume".to_string(), json!(1000 + i));
                    row
                })
                .collect();
            Table::new(
                vec!["timestamp".to_string(), "close".to_string(), "volume".to_string()],
                rows,
            )
        })
        .collect()
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap();
    let range = ResolvedRange::resolve("7d", now).unwrap();

    for files in [1, 10, 50] {
        let tables = create_tables(files, 375);
        group.throughput(Throughput::Elements((files * 375) as u64));

        group.bench_function(format!("concat_{}_files", files), |b| {
            b.iter(|| concat_tables(black_box(tables.clone())))
        });

        group.bench_function(format!("assemble_{}_files", files), |b| {
            b.iter(|| ResultAssembler::new(range).assemble(black_box(tables.clone())).unwrap())
        });
    }

    group.finish();
}

fn bench_parse_timestamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_timestamp");

    let cases = [
        ("rfc3339", json!("2024-03-10T09:15:00+05:30")),
        ("naive_space", json!("2024-03-10 09:15:00")),
        ("epoch_nanos", json!(1_710_062_100_000_000_000_i64)),
        ("unparsable", Value::String("n/a".to_string())),
    ];

    for (name, value) in cases {
        group.bench_function(name, |b| b.iter(|| parse_timestamp(black_box(&value))));
    }

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_parse_timestamp);
criterion_main!(benches);
