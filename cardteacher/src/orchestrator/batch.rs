//! Batch orchestration implementation

use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::stats::BatchStats;
use super::types::{BatchError, BatchResult, GenerateError};
use crate::export::ExportWriter;
use crate::limiter::RateLimiter;
use crate::pipeline::{run_item, CardData, LookupCache, PipelineContext, PipelineError};
use crate::provider::{CardSource, DictionarySource, TranslationSource};

/// Runs one item pipeline per card name and gathers the results.
///
/// Every batch gets a fresh lookup cache and a fresh cancellation token;
/// the rate limiter is shared by all batches of one orchestrator.
///
/// # Example
///
/// ```ignore
/// use cardteacher::orchestrator::BatchOrchestrator;
/// use cardteacher::limiter::RateLimiter;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(20, Duration::from_secs(1)));
/// let orchestrator = BatchOrchestrator::new(cards, dictionary, translator, limiter);
/// let result = orchestrator.run_batch(&names).await?;
/// ```
pub struct BatchOrchestrator<C, D, T>
where
    C: CardSource,
    D: DictionarySource,
    T: TranslationSource,
{
    cards: Arc<C>,
    dictionary: Arc<D>,
    translator: Arc<T>,
    limiter: Arc<RateLimiter>,
}

impl<C, D, T> BatchOrchestrator<C, D, T>
where
    C: CardSource + 'static,
    D: DictionarySource + 'static,
    T: TranslationSource + 'static,
{
    /// Creates a new orchestrator.
    pub fn new(
        cards: Arc<C>,
        dictionary: Arc<D>,
        translator: Arc<T>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            cards,
            dictionary,
            translator,
            limiter,
        }
    }

    /// Returns the shared rate limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Runs a batch with its own cancellation token.
    pub async fn run_batch(&self, names: &[String]) -> Result<BatchResult, BatchError> {
        self.run_batch_with_token(names, CancellationToken::new())
            .await
    }

    /// Runs a batch that can also be cancelled through `cancel`.
    ///
    /// The first failing card cancels every other pipeline and its error is
    /// returned. All tasks are joined before this returns, whatever the
    /// outcome. Cancelling `cancel` without any card failing yields
    /// [`BatchError::Cancelled`].
    pub async fn run_batch_with_token(
        &self,
        names: &[String],
        cancel: CancellationToken,
    ) -> Result<BatchResult, BatchError> {
        let start = Instant::now();
        let permits_before = self.limiter.acquired_total();

        // Child token: a failure here must not cancel the caller's token
        let batch_cancel = cancel.child_token();
        let cache = Arc::new(LookupCache::new());
        let ctx = PipelineContext::new(
            Arc::clone(&self.cards),
            Arc::clone(&self.dictionary),
            Arc::clone(&self.translator),
            Arc::clone(&cache),
            Arc::clone(&self.limiter),
            batch_cancel.clone(),
        );

        info!(items = names.len(), "Starting batch");

        let mut pipelines = JoinSet::new();
        for (index, name) in names.iter().enumerate() {
            let ctx = ctx.clone();
            let name = name.clone();
            pipelines.spawn(async move {
                let result = run_item(&name, &ctx).await;
                (index, name, result)
            });
        }

        let mut slots: Vec<Option<CardData>> = vec![None; names.len()];
        let mut failure: Option<BatchError> = None;

        while let Some(joined) = pipelines.join_next().await {
            let error = match joined {
                Ok((index, name, Ok(data))) => {
                    debug!(card = %name, words = data.words.len(), "Card completed");
                    slots[index] = Some(data);
                    continue;
                }
                // Fallout of a cancellation that is already accounted for
                Ok((_, _, Err(PipelineError::Cancelled))) => continue,
                Ok((_, name, Err(source))) => BatchError::ItemFailed { item: name, source },
                Err(join_err) => BatchError::TaskPanicked(join_err.to_string()),
            };

            if failure.is_none() {
                warn!(error = %error, "Batch failed, cancelling remaining cards");
                batch_cancel.cancel();
                failure = Some(error);
            }
        }

        let completed = slots.iter().filter(|slot| slot.is_some()).count();
        let stats = BatchStats {
            items: names.len(),
            completed,
            elapsed: start.elapsed(),
            cache: cache.stats(),
            permits_acquired: self.limiter.acquired_total() - permits_before,
        };
        cache.log_stats();
        stats.log();

        if let Some(error) = failure {
            return Err(error);
        }

        match slots.into_iter().collect::<Option<Vec<_>>>() {
            Some(cards) => {
                info!(cards = cards.len(), "Batch complete");
                Ok(BatchResult { cards, stats })
            }
            None => {
                info!(completed, items = names.len(), "Batch cancelled");
                Err(BatchError::Cancelled)
            }
        }
    }

    /// Runs a batch and hands the result to `writer`.
    ///
    /// The writer is only invoked when every card succeeded.
    pub async fn run_and_export<W>(
        &self,
        names: &[String],
        writer: &W,
        cancel: CancellationToken,
    ) -> Result<BatchResult, GenerateError>
    where
        W: ExportWriter,
    {
        let result = self.run_batch_with_token(names, cancel).await?;
        writer.write(&result)?;
        Ok(result)
    }
}
