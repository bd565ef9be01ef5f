//! Appender implementations

pub mod memory;
pub mod rotating_file;

pub use memory::MemoryAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy, ROTATION_RETRY_LINES};

pub use crate::core::Appender;
