//! Basic writer usage example
//!
//! Demonstrates synchronous logging to a rotating file and level filtering.
//!
//! Run with: cargo run --example basic_usage

use rust_blocking_logger::prelude::*;
use rust_blocking_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Blocking Logger - Basic Usage Example ===\n");

    // Producers write straight to the file; no writer thread
    let writer = AsyncLogWriter::builder()
        .sync_mode()
        .directory("./log")
        .base_name("basic")
        .min_level(LogLevel::Debug)
        .build()?;

    println!("1. Logging at different levels:");
    writer.debug("This is a debug message");
    writer.info("This is an info message");
    writer.warn("This is a warning message");
    writer.error("This is an error message");

    println!("\n2. Formatted messages:");
    let port = 8080;
    info!(writer, "Server listening on port {}", port);
    warn!(writer, "{} of {} workers busy", 7, 8);

    println!("\n3. Raising the minimum level to WARN:");
    writer.set_min_level(LogLevel::Warn);
    writer.debug("Debug message (hidden)");
    writer.info("Info message (hidden)");
    writer.warn("Warning message (visible)");

    writer.flush()?;
    println!(
        "   written: {}, filtered: {}",
        writer.metrics().lines_written(),
        writer.metrics().lines_filtered()
    );
    println!("   Output is under ./log/basic_YYYY_MM_DD.log");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
