//! Per-card enrichment pipeline.
//!
//! One run resolves a card name into [`CardData`]:
//!
//! 1. Card record pair, cached under `primary_<name>`
//! 2. Lookup keys derived from the default-language card
//! 3. Dictionary entry and translation per key, cached under `word_<key>`
//!
//! Word lookups run one after another; concurrency comes from running many
//! cards at once. Any failure ends the run.

use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::context::{primary_key, word_key, CachedLookup, LookupCache, PipelineContext};
use super::error::{LookupError, PipelineError};
use crate::provider::{
    check_embedded_code, Card, CardPair, CardSource, DictionaryEntry, DictionarySource,
    ProviderError, TranslationEntry, TranslationSource,
};
use crate::words::derive_lookup_keys;

const DICTIONARY_SERVICE: &str = "dictionary";
const TRANSLATE_SERVICE: &str = "translate";

/// Dictionary entry and translation for one lookup key.
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    /// The lookup key as derived from the card
    pub word: String,
    /// Dictionary lookup result
    pub dictionary: DictionaryEntry,
    /// Machine translation result
    pub translation: TranslationEntry,
}

/// Everything gathered for one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardData {
    /// Card name as requested
    pub name: String,
    /// Default-language printing
    pub card: Card,
    /// Alternate-language printing
    pub localized: Card,
    /// Keys derived from the default-language card
    pub lookup_keys: Vec<String>,
    /// One entry per lookup key, same order
    pub words: Vec<Arc<WordEntry>>,
}

/// Runs the pipeline for one card name.
///
/// Cancellation is checked before every step; lookups in flight when the
/// batch is cancelled are abandoned and the run returns
/// [`PipelineError::Cancelled`].
pub async fn run_item<C, D, T>(
    name: &str,
    ctx: &PipelineContext<C, D, T>,
) -> Result<CardData, PipelineError>
where
    C: CardSource + 'static,
    D: DictionarySource + 'static,
    T: TranslationSource + 'static,
{
    ensure_active(ctx)?;
    info!(card = name, "Receiving card info");
    let pair = resolve_card(name, ctx).await?;

    ensure_active(ctx)?;
    let lookup_keys = derive_lookup_keys(&pair.card);
    debug!(card = name, keys = lookup_keys.len(), "Derived lookup keys");

    let mut words = Vec::with_capacity(lookup_keys.len());
    for key in &lookup_keys {
        ensure_active(ctx)?;
        words.push(resolve_word(key, ctx).await?);
    }

    debug!(card = name, words = words.len(), "Card data complete");

    Ok(CardData {
        name: name.to_string(),
        card: pair.card.clone(),
        localized: pair.localized.clone(),
        lookup_keys,
        words,
    })
}

fn ensure_active<C, D, T>(ctx: &PipelineContext<C, D, T>) -> Result<(), PipelineError>
where
    C: CardSource,
    D: DictionarySource,
    T: TranslationSource,
{
    if ctx.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

async fn resolve_card<C, D, T>(
    name: &str,
    ctx: &PipelineContext<C, D, T>,
) -> Result<Arc<CardPair>, PipelineError>
where
    C: CardSource + 'static,
    D: DictionarySource,
    T: TranslationSource,
{
    let key = primary_key(name);
    let cards = Arc::clone(&ctx.cards);
    let cancel = ctx.cancel.clone();
    let lookup_name = name.to_string();

    let outcome = join_cached(&ctx.cache, &ctx.cancel, &key, move || async move {
        let pair = until_cancelled(&cancel, cards.lookup_card(&lookup_name)).await?;
        Ok::<_, LookupError>(CachedLookup::Card(Arc::new(pair)))
    })
    .await?;

    match outcome {
        CachedLookup::Card(pair) => Ok(pair),
        CachedLookup::Word(_) => Err(PipelineError::UnexpectedEntry { key }),
    }
}

async fn resolve_word<C, D, T>(
    word: &str,
    ctx: &PipelineContext<C, D, T>,
) -> Result<Arc<WordEntry>, PipelineError>
where
    C: CardSource,
    D: DictionarySource + 'static,
    T: TranslationSource + 'static,
{
    let key = word_key(word);
    let dictionary = Arc::clone(&ctx.dictionary);
    let translator = Arc::clone(&ctx.translator);
    let limiter = Arc::clone(&ctx.limiter);
    let cancel = ctx.cancel.clone();
    let word = word.to_string();

    let outcome = join_cached(&ctx.cache, &ctx.cancel, &key, move || async move {
        limiter.acquire(&cancel).await?;
        let entry = until_cancelled(&cancel, dictionary.lookup(&word)).await?;
        check_embedded_code(DICTIONARY_SERVICE, entry.code, entry.message.as_deref())?;

        limiter.acquire(&cancel).await?;
        let translation = until_cancelled(&cancel, translator.translate(&word)).await?;
        check_embedded_code(
            TRANSLATE_SERVICE,
            translation.code,
            translation.message.as_deref(),
        )?;

        debug!(word = %word, "Word lookup complete");
        Ok::<_, LookupError>(CachedLookup::Word(Arc::new(WordEntry {
            word,
            dictionary: entry,
            translation,
        })))
    })
    .await?;

    match outcome {
        CachedLookup::Word(entry) => Ok(entry),
        CachedLookup::Card(_) => Err(PipelineError::UnexpectedEntry { key }),
    }
}

/// Joins (or starts) the cached computation for `key`, giving up on cancel.
async fn join_cached<F, Fut>(
    cache: &LookupCache,
    cancel: &CancellationToken,
    key: &str,
    compute: F,
) -> Result<CachedLookup, PipelineError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<CachedLookup, LookupError>> + Send + 'static,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
        outcome = cache.get_or_compute(key, compute) => {
            outcome.map_err(|e| PipelineError::from_lookup(key, e))
        }
    }
}

/// Races a provider call against cancellation; a late result is discarded.
async fn until_cancelled<R, Fut>(cancel: &CancellationToken, call: Fut) -> Result<R, LookupError>
where
    Fut: Future<Output = Result<R, ProviderError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LookupError::Cancelled),
        result = call => result.map_err(LookupError::from),
    }
}
