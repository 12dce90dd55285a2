//! Lease/release throughput compared against constructing a fresh instance every time.
//!
//! The workload formats a short hex string into a buffer, which is the kind of small
//! allocation-heavy work that pooling is meant to relieve.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::fmt::Write as _;
use std::hint::black_box;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use lease_pool::{Pool, QueuePool};
use new_zealand::nz;

const BUFFER_CAPACITY: usize = 64;
const THREADS: usize = 4;

fn new_buffer() -> String {
    String::with_capacity(BUFFER_CAPACITY)
}

fn fill(buffer: &mut String, value: u64) {
    buffer.clear();
    write!(buffer, "{value:x}").expect("writing to a String cannot fail");
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("lp_single_thread");

    group.bench_function("no_pool", |b| {
        let mut value = 0_u64;
        b.iter(|| {
            let mut buffer = new_buffer();
            fill(&mut buffer, value);
            value = value.wrapping_add(1);
            black_box(buffer);
        });
    });

    group.bench_function("unbounded", |b| {
        let pool = QueuePool::unbounded(new_buffer);
        let mut value = 0_u64;
        b.iter(|| {
            let Ok(mut buffer) = pool.lease();
            fill(&mut buffer, value);
            value = value.wrapping_add(1);
            pool.release(black_box(buffer));
        });
    });

    group.bench_function("bounded", |b| {
        let pool = QueuePool::bounded(nz!(1024), new_buffer);
        let mut value = 0_u64;
        b.iter(|| {
            let Ok(mut buffer) = pool.lease();
            fill(&mut buffer, value);
            value = value.wrapping_add(1);
            pool.release(black_box(buffer));
        });
    });

    group.finish();

    let mut group = c.benchmark_group("lp_multi_thread");

    group.bench_function("no_pool", |b| {
        b.iter_custom(|iterations| {
            run_threads(iterations, || {
                let mut buffer = new_buffer();
                fill(&mut buffer, black_box(42));
                black_box(buffer);
            })
        });
    });

    group.bench_function("unbounded", |b| {
        let pool = QueuePool::unbounded(new_buffer);
        b.iter_custom(|iterations| {
            run_threads(iterations, || {
                let Ok(mut buffer) = pool.lease();
                fill(&mut buffer, black_box(42));
                pool.release(black_box(buffer));
            })
        });
    });

    group.bench_function("bounded", |b| {
        let pool = QueuePool::bounded(nz!(1024), new_buffer);
        b.iter_custom(|iterations| {
            run_threads(iterations, || {
                let Ok(mut buffer) = pool.lease();
                fill(&mut buffer, black_box(42));
                pool.release(black_box(buffer));
            })
        });
    });

    group.finish();
}

/// Runs `op` `iterations` times on each of `THREADS` threads and returns the mean time per
/// iteration across threads, scaled back to `iterations` operations.
fn run_threads(iterations: u64, op: impl Fn() + Sync) -> Duration {
    let barrier = Barrier::new(THREADS);

    let total: Duration = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let start = Instant::now();
                    for _ in 0..iterations {
                        op();
                    }
                    start.elapsed()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("benchmark thread panicked"))
            .sum()
    });

    total / u32::try_from(THREADS).expect("thread count fits in u32")
}

criterion_group!(benches, entrypoint);
criterion_main!(benches);
