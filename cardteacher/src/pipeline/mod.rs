//! Per-card enrichment pipeline.
//!
//! Turns one card name into [`CardData`]: the card record in two languages
//! plus a dictionary entry and a translation for every word on the card.
//!
//! # Architecture
//!
//! ```text
//! name ─► primary_<name> ─► derive lookup keys ─► word_<key> (per key) ─► CardData
//!              │                                       │
//!              ▼                                       ▼
//!         CardSource                       RateLimiter + DictionarySource
//!                                          RateLimiter + TranslationSource
//! ```
//!
//! Every lookup goes through the batch-wide [`LookupCache`], so a word that
//! appears on many cards is fetched once. The [`PipelineContext`] carries
//! the cache, the limiter and the cancellation token explicitly; nothing is
//! global.
//!
//! # Example
//!
//! ```ignore
//! use cardteacher::pipeline::{run_item, PipelineContext};
//!
//! let ctx = PipelineContext::new(cards, dictionary, translator, cache, limiter, cancel);
//! let data = run_item("lightning bolt", &ctx).await?;
//! println!("{} words", data.words.len());
//! ```

mod context;
mod error;
mod item;

pub use context::{
    primary_key, word_key, CachedLookup, LookupCache, PipelineContext, PRIMARY_KEY_PREFIX,
    WORD_KEY_PREFIX,
};
pub use error::{LookupError, PipelineError};
pub use item::{run_item, CardData, WordEntry};

#[cfg(test)]
pub use item::tests::{
    card_pair, context, dictionary_entry, MockCards, MockDictionary, MockTranslator,
};
