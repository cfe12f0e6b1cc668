//! Batch orchestration
//!
//! Fans out one item pipeline per card name on the tokio runtime, shares the
//! rate limiter, lookup cache and cancellation token between them, and fails
//! the whole batch on the first card that fails.

mod batch;
mod stats;
mod types;

pub use batch::BatchOrchestrator;
pub use stats::BatchStats;
pub use types::{BatchError, BatchResult, GenerateError};
