//! Benchmarks for the history log and the commit path.
//!
//! Run with: cargo bench -p mdpost-runtime --bench history_bench
//!
//! Measures:
//! - `record` into a full log (eviction on every push)
//! - a full undo/redo sweep across the log
//! - a typing burst through the controller, debounce and all

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use mdpost_core::config::EditorConfig;
use mdpost_core::event::{KeyCode, KeyEvent};
use mdpost_runtime::undo::{HistoryConfig, HistoryLog};
use mdpost_runtime::{InputController, MemorySurface};

fn document(len: usize) -> String {
    "- item line\n".repeat(len / 12 + 1)
}

fn bench_record_at_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("history/record_full");
    for depth in [100usize, 1000] {
        let doc = document(4096);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut log = HistoryLog::new(HistoryConfig::new(depth));
            for i in 0..depth {
                log.record(&format!("{doc}{i}"));
            }
            let mut i = depth;
            b.iter(|| {
                i += 1;
                black_box(log.record(&format!("{doc}{i}")));
            });
        });
    }
    group.finish();
}

fn bench_undo_redo_sweep(c: &mut Criterion) {
    let doc = document(4096);
    let mut log = HistoryLog::new(HistoryConfig::unlimited());
    for i in 0..500 {
        log.record(&format!("{doc}{i}"));
    }
    c.bench_function("history/undo_redo_sweep_500", |b| {
        b.iter(|| {
            while let Some(v) = log.undo() {
                black_box(v);
            }
            while let Some(v) = log.redo() {
                black_box(v);
            }
        });
    });
}

fn bench_typing_burst(c: &mut Criterion) {
    c.bench_function("controller/typing_burst_200", |b| {
        b.iter(|| {
            let surface = MemorySurface::new(document(2048));
            let mut ctl = InputController::new(surface, &EditorConfig::default());
            for i in 0..200u64 {
                let now = Duration::from_millis(i * 30);
                if ctl.handle_key(&KeyEvent::new(KeyCode::Tab), now).changed {
                    ctl.tick(now);
                }
            }
            black_box(ctl.tick(Duration::from_secs(60)))
        });
    });
}

criterion_group!(
    benches,
    bench_record_at_capacity,
    bench_undo_redo_sweep,
    bench_typing_burst
);
criterion_main!(benches);
