//! # Transaction History Benchmarks
//!
//! | Stage | Expected cost |
//! |-------|---------------|
//! | dedup by txhash | O(n) |
//! | distinct heights | O(n) |
//! | apply block times | O(n) |
//! | full fetch over mocks | one lookup per distinct height |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use shared_bus::InMemoryEventBus;
use shared_types::{Height, SessionHandle, TxCategory, TxRecord};
use wallet_telemetry::MemoryReporter;
use wc_01_transaction_history::{
    apply_block_times, dedup_by_txhash, distinct_heights, MockNode, TransactionHistoryApi,
    TransactionHistoryService, TxHistoryConfig, TxHistoryState,
};

/// `size` records where every hash appears twice and every ten records share
/// a block.
fn records(size: usize) -> Vec<TxRecord> {
    (0..size)
        .map(|i| TxRecord::new(format!("TX{}", i / 2), (i / 10) as Height + 1))
        .collect()
}

// ============================================================================
// PURE PIPELINE STAGES
// ============================================================================

fn bench_pipeline_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("wc-01-pipeline");

    for size in [100, 1_000, 10_000] {
        let input = records(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("dedup_by_txhash", size), &input, |b, input| {
            b.iter(|| black_box(dedup_by_txhash(input.clone())))
        });

        group.bench_with_input(BenchmarkId::new("distinct_heights", size), &input, |b, input| {
            b.iter(|| black_box(distinct_heights(input)))
        });

        let times: HashMap<Height, i64> = distinct_heights(&input)
            .into_iter()
            .map(|h| (h, h as i64 * 1_000))
            .collect();
        let state = TxHistoryState {
            wallet: input.clone(),
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("apply_block_times", size),
            &state,
            |b, state| {
                b.iter(|| {
                    let mut state = state.clone();
                    black_box(apply_block_times(&mut state, &times))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// FULL FETCH OVER MOCK NODE
// ============================================================================

fn bench_get_all_txs(c: &mut Criterion) {
    let mut group = c.benchmark_group("wc-01-get-all-txs");
    group.measurement_time(Duration::from_secs(10));

    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");

    for size in [100, 1_000] {
        let input = records(size);
        let mut node = MockNode::new().with_txs(TxCategory::Wallet, input.clone());
        for height in distinct_heights(&input) {
            node = node.with_block(height, "2021-01-01T00:00:00Z");
        }
        let node = Arc::new(node);

        let service = TransactionHistoryService::new(
            TxHistoryConfig::default(),
            node.clone(),
            node,
            Arc::new(SessionHandle::signed_in("cosmos1bench".into())),
            Arc::new(InMemoryEventBus::new()),
            Arc::new(MemoryReporter::new()),
        );

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::new("mock_node", size), |b| {
            b.iter(|| rt.block_on(async { black_box(service.get_all_txs().await) }))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline_stages, bench_get_all_txs);
criterion_main!(benches);
