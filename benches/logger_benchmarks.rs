//! Criterion benchmarks for rust_blocking_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_blocking_logger::prelude::*;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Queue Benchmarks
// ============================================================================

fn bench_queue_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_single_thread");
    group.throughput(Throughput::Elements(1));

    let queue = BoundedBlockingDeque::new(1024).unwrap();

    group.bench_function("push_back_pop_front", |b| {
        b.iter(|| {
            queue.push_back(black_box(42u64)).unwrap();
            black_box(queue.pop_front())
        });
    });

    group.bench_function("push_front_pop_front", |b| {
        b.iter(|| {
            queue.push_front(black_box(42u64)).unwrap();
            black_box(queue.pop_front())
        });
    });

    group.finish();
}

fn bench_queue_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_handoff");
    const ITEMS: u64 = 10_000;
    group.throughput(Throughput::Elements(ITEMS));

    for capacity in [1usize, 16, 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let queue = Arc::new(BoundedBlockingDeque::new(capacity).unwrap());
                    let producer = {
                        let queue = Arc::clone(&queue);
                        thread::spawn(move || {
                            for i in 0..ITEMS {
                                queue.push_back(i).unwrap();
                            }
                        })
                    };
                    for _ in 0..ITEMS {
                        black_box(queue.pop_front());
                    }
                    producer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Writer Benchmarks
// ============================================================================

fn bench_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer");
    group.throughput(Throughput::Elements(1));

    let async_writer = AsyncLogWriter::builder()
        .async_mode(10_000)
        .appender(MemoryAppender::new())
        .build()
        .unwrap();

    group.bench_function("async_info", |b| {
        b.iter(|| async_writer.info(black_box("Info message")));
    });

    let sync_writer = AsyncLogWriter::builder()
        .sync_mode()
        .appender(MemoryAppender::new())
        .build()
        .unwrap();

    group.bench_function("sync_info", |b| {
        b.iter(|| sync_writer.info(black_box("Info message")));
    });

    group.finish();
}

fn bench_file_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_writer");
    group.throughput(Throughput::Elements(1));

    let temp_dir = tempfile::tempdir().unwrap();
    let writer = AsyncLogWriter::builder()
        .async_mode(10_000)
        .directory(temp_dir.path())
        .base_name("bench")
        .max_lines(0)
        .build()
        .unwrap();

    group.bench_function("async_formatted", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            rust_blocking_logger::info!(writer, "request {} served in {}us", i, 37);
        });
    });

    group.finish();
    writer.shutdown();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let writer = AsyncLogWriter::builder()
        .min_level(LogLevel::Error)
        .appender(MemoryAppender::new())
        .build()
        .unwrap();

    group.bench_function("filtered_debug", |b| {
        b.iter(|| rust_blocking_logger::debug!(writer, "value {}", black_box(7)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_queue_single_thread,
    bench_queue_handoff,
    bench_writer,
    bench_file_writer,
    bench_level_filtering,
);

criterion_main!(benches);
