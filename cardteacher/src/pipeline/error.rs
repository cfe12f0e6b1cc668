//! Error types for the item pipeline.
//!
//! Lookups that go through the cache fail with [`LookupError`], which is
//! recorded against the cache key. The pipeline wraps it in
//! [`PipelineError`] together with the key that failed.

use thiserror::Error;

use crate::limiter::LimiterError;
use crate::provider::ProviderError;

/// Outcome recorded in the cache for a failed lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// A provider call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The batch was cancelled before the lookup finished
    #[error("lookup cancelled")]
    Cancelled,
}

impl From<LimiterError> for LookupError {
    fn from(e: LimiterError) -> Self {
        match e {
            LimiterError::Cancelled => LookupError::Cancelled,
        }
    }
}

/// Errors that end an item pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A cached lookup failed
    #[error("lookup '{key}' failed: {source}")]
    Provider {
        key: String,
        #[source]
        source: ProviderError,
    },

    /// A cache key held a value of the wrong kind
    #[error("unexpected cache entry for '{key}'")]
    UnexpectedEntry { key: String },

    /// The batch was cancelled
    #[error("pipeline cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Wraps a cache outcome for `key`.
    pub fn from_lookup(key: impl Into<String>, error: LookupError) -> Self {
        match error {
            LookupError::Provider(source) => PipelineError::Provider {
                key: key.into(),
                source,
            },
            LookupError::Cancelled => PipelineError::Cancelled,
        }
    }

    /// Returns true if this error only reflects cancellation by someone else.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled)
    }
}
