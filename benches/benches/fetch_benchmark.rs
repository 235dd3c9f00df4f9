//! End-to-end fetch against an in-process ABX server.
//!
//! Run with: `cargo bench --package abx-bench --bench fetch_benchmark`

use abx_bench::{spawn_server, synthetic_stream};
use abx_lib::{AbxClient, ClientConfig, RecoveryConfig, fetch_records};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::time::Duration;

fn fetch_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let recovery = RecoveryConfig {
        max_passes: 2,
        retry_delay: Duration::ZERO,
    };

    let mut group = c.benchmark_group("fetch");
    group.sample_size(20);

    // Sequences above 255 cannot be resent, so gaps stay within that range.
    for (name, drop_every) in [("contiguous", 0), ("gap_every_25", 25)] {
        let addr = runtime.block_on(spawn_server(synthetic_stream(250, drop_every))).unwrap();
        let client = AbxClient::new(ClientConfig::new(addr.ip().to_string(), addr.port()));

        group.throughput(Throughput::Elements(250));
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.to_async(&runtime).iter(|| async {
                let outcome = fetch_records(&client, &recovery, |_| {}).await.unwrap();
                assert!(outcome.is_complete());
                outcome
            });
        });
    }

    group.finish();
}

criterion_group!(benches, fetch_benchmark);
criterion_main!(benches);
