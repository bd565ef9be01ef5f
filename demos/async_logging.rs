//! Async logging example
//!
//! Demonstrates the bounded queue with many producer threads, urgent lines,
//! and an orderly shutdown.
//!
//! Run with: cargo run --example async_logging

use rust_blocking_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    println!("=== Rust Blocking Logger - Async Logging Example ===\n");

    // A small queue so producers feel backpressure
    let writer = Arc::new(
        AsyncLogWriter::builder()
            .async_mode(64)
            .directory("./log")
            .base_name("async_demo")
            .max_lines(5_000)
            .close_policy(ClosePolicy::Drain)
            .flush_interval(Duration::from_millis(50))
            .build()?,
    );

    println!("1. Multi-threaded logging:");
    let start = Instant::now();

    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..2_000 {
                    writer.info(format!("Thread {} - Message {}", thread_id, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    println!("   10000 lines queued in {:?}", start.elapsed());

    println!("\n2. Urgent line ahead of the backlog:");
    writer.write_urgent(LogLevel::Error, "Upstream connection lost");

    writer.flush()?;

    let metrics = writer.metrics();
    println!("\n3. Metrics:");
    println!("   accepted:      {}", metrics.lines_accepted());
    println!("   written:       {}", metrics.lines_written());
    println!("   block events:  {}", metrics.block_events());
    println!("   loss rate:     {:.2}%", metrics.loss_rate());

    println!("\n4. Shutting down (draining the queue)");
    if !writer.shutdown() {
        eprintln!("   writer did not stop cleanly");
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
