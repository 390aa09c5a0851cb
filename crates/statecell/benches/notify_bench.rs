//! Benchmarks for notification passes.
//!
//! Run with: `cargo bench --package statecell --bench notify_bench`
//!
//! Measures `change` cost as the subscriber count grows, in both notify
//! modes, plus the cost of an unsubscribe that has to scan the whole list.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use statecell::{NotifyMode, RecordConfig, State, Subscriber, create, create_with_config};
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

fn bump(state: &mut State) {
    let next = state.get("count").and_then(Value::as_i64).unwrap_or(0) + 1;
    state.set("count", next);
}

fn bench_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("change");
    for &subscribers in &[0usize, 1, 16, 256] {
        for mode in [NotifyMode::Snapshot, NotifyMode::Live] {
            let record = create_with_config(
                Some(json!({"count": 0})),
                RecordConfig::default().with_notify_mode(mode),
            );
            let hits = Rc::new(Cell::new(0u64));
            for _ in 0..subscribers {
                let hits = Rc::clone(&hits);
                record.subscribe(&Subscriber::callback(move |_| hits.set(hits.get() + 1)));
            }

            group.throughput(Throughput::Elements(subscribers.max(1) as u64));
            group.bench_with_input(
                BenchmarkId::new(mode.as_str(), subscribers),
                &record,
                |b, record| b.iter(|| black_box(record.change(bump))),
            );
        }
    }
    group.finish();
}

fn bench_unsubscribe_tail(c: &mut Criterion) {
    let mut group = c.benchmark_group("unsubscribe_tail");
    for &subscribers in &[16usize, 256] {
        let record = create(None);
        for _ in 0..subscribers {
            record.subscribe(&Subscriber::callback(|_| {}));
        }
        let tail = Subscriber::callback(|_| {});

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &record,
            |b, record| {
                b.iter(|| {
                    record.subscribe(&tail);
                    black_box(record.unsubscribe(&tail))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_change, bench_unsubscribe_tail);
criterion_main!(benches);
