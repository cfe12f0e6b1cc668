//! Pipeline context containing shared resources.
//!
//! The `PipelineContext` carries everything an item pipeline needs that is
//! shared with its siblings in the same batch: the data sources, the lookup
//! cache, the rate limiter and the batch cancellation token.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::error::LookupError;
use super::item::WordEntry;
use crate::cache::SingleFlightCache;
use crate::limiter::RateLimiter;
use crate::provider::{CardPair, CardSource, DictionarySource, TranslationSource};

/// Prefix of cache keys holding card records.
pub const PRIMARY_KEY_PREFIX: &str = "primary_";

/// Prefix of cache keys holding word lookups.
pub const WORD_KEY_PREFIX: &str = "word_";

/// A resolved lookup stored in the cache.
#[derive(Debug, Clone)]
pub enum CachedLookup {
    /// Card record pair, stored under `primary_<name>`
    Card(Arc<CardPair>),
    /// Dictionary entry and translation, stored under `word_<word>`
    Word(Arc<WordEntry>),
}

/// Cache shared by all pipelines of one batch.
pub type LookupCache = SingleFlightCache<CachedLookup, LookupError>;

/// Returns the cache key for a card name.
pub fn primary_key(name: &str) -> String {
    format!("{PRIMARY_KEY_PREFIX}{name}")
}

/// Returns the cache key for a word. Words differing only in case share a key.
pub fn word_key(word: &str) -> String {
    format!("{WORD_KEY_PREFIX}{}", word.to_lowercase())
}

/// Shared context for item pipelines.
///
/// Cloning is cheap; every field is reference counted or a token handle.
pub struct PipelineContext<C, D, T>
where
    C: CardSource,
    D: DictionarySource,
    T: TranslationSource,
{
    /// Card record source
    pub cards: Arc<C>,

    /// Dictionary source
    pub dictionary: Arc<D>,

    /// Translation source
    pub translator: Arc<T>,

    /// Lookup cache for this batch
    pub cache: Arc<LookupCache>,

    /// Rate limiter for dictionary and translation calls
    pub limiter: Arc<RateLimiter>,

    /// Batch cancellation token
    pub cancel: CancellationToken,
}

impl<C, D, T> PipelineContext<C, D, T>
where
    C: CardSource,
    D: DictionarySource,
    T: TranslationSource,
{
    /// Creates a new pipeline context.
    pub fn new(
        cards: Arc<C>,
        dictionary: Arc<D>,
        translator: Arc<T>,
        cache: Arc<LookupCache>,
        limiter: Arc<RateLimiter>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            cards,
            dictionary,
            translator,
            cache,
            limiter,
            cancel,
        }
    }

    /// Returns true once the batch has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<C, D, T> Clone for PipelineContext<C, D, T>
where
    C: CardSource,
    D: DictionarySource,
    T: TranslationSource,
{
    fn clone(&self) -> Self {
        Self {
            cards: Arc::clone(&self.cards),
            dictionary: Arc::clone(&self.dictionary),
            translator: Arc::clone(&self.translator),
            cache: Arc::clone(&self.cache),
            limiter: Arc::clone(&self.limiter),
            cancel: self.cancel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed() {
        assert_eq!(primary_key("island"), "primary_island");
        assert_eq!(word_key("enter"), "word_enter");
    }

    #[test]
    fn test_word_key_folds_case() {
        assert_eq!(word_key("Shock Trooper"), "word_shock trooper");
        assert_eq!(word_key("Shock Trooper"), word_key("shock trooper"));
    }
}
