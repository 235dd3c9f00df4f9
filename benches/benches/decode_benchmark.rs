//! Decoding and gap detection throughput.
//!
//! Run with: `cargo bench --package abx-bench --bench decode_benchmark`

use abx_bench::synthetic_stream;
use abx_lib::{JsonFormatter, OutputFormat, RecordSet, decode_records};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const SIZES: [i32; 3] = [100, 1_000, 10_000];

fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for count in SIZES {
        let bytes = synthetic_stream(count, 0);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| {
                let records: RecordSet = decode_records(black_box(bytes)).unwrap().collect();
                records
            });
        });
    }

    group.finish();
}

fn gap_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("missing_sequences");

    for count in SIZES {
        let bytes = synthetic_stream(count, 10);
        let records: RecordSet = decode_records(&bytes).unwrap().collect();
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(records).missing_sequences());
        });
    }

    group.finish();
}

fn export_benchmark(c: &mut Criterion) {
    let bytes = synthetic_stream(10_000, 0);
    let records: RecordSet = decode_records(&bytes).unwrap().collect();

    let mut group = c.benchmark_group("export");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("json_pretty", |b| {
        let formatter = JsonFormatter::new().with_pretty(true);
        b.iter(|| formatter.render(black_box(&records)).unwrap());
    });

    for format in OutputFormat::all() {
        group.bench_function(BenchmarkId::new("write", format), |b| {
            b.iter(|| {
                let mut buf = Vec::with_capacity(1 << 20);
                format.write_records(black_box(&records), &mut buf).unwrap();
                buf
            });
        });
    }

    group.finish();
}

criterion_group!(benches, decode_benchmark, gap_benchmark, export_benchmark);
criterion_main!(benches);
