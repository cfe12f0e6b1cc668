//! Types for batch orchestration.

use thiserror::Error;

use super::stats::BatchStats;
use crate::export::ExportError;
use crate::pipeline::{CardData, PipelineError};

/// Errors that end a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    /// A card pipeline failed; the rest of the batch was cancelled
    #[error("card '{item}' failed: {source}")]
    ItemFailed {
        item: String,
        #[source]
        source: PipelineError,
    },

    /// A pipeline task panicked
    #[error("pipeline task panicked: {0}")]
    TaskPanicked(String),

    /// The batch was cancelled from outside before every card finished
    #[error("batch cancelled")]
    Cancelled,
}

/// Successful outcome of a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// One entry per requested name, in request order
    pub cards: Vec<CardData>,
    /// Run statistics
    pub stats: BatchStats,
}

/// Errors from a batch followed by an export.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
