//! Single-flight cache implementation.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

type SharedOutcome<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

/// Statistics for monitoring cache effectiveness.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total `get_or_compute` calls
    pub total_requests: u64,
    /// Calls that started a computation
    pub computations: u64,
    /// Calls that joined a computation still in flight
    pub coalesced_requests: u64,
    /// Calls served from a resolved entry
    pub hits: u64,
}

impl CacheStats {
    /// Returns the share of requests that did not start a computation (0.0 to 1.0)
    pub fn dedup_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.coalesced_requests + self.hits) as f64 / self.total_requests as f64
        }
    }
}

/// Concurrency-safe cache that runs at most one computation per key.
///
/// Every key maps to a shared future. The first caller for a key inserts
/// the future; later callers clone it and await the same outcome. Successes
/// and failures are both retained for the lifetime of the cache, so a
/// failed key is never recomputed.
///
/// The map shard lock is held only while deciding whether a key is new.
/// The computation itself runs outside any lock, driven by whichever caller
/// polls the shared future; it keeps running as long as at least one caller
/// is still waiting, even if the caller that started it goes away.
pub struct SingleFlightCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    entries: DashMap<String, SharedOutcome<V, E>>,
    total_requests: AtomicU64,
    computations: AtomicU64,
    coalesced_requests: AtomicU64,
    hits: AtomicU64,
}

impl<V, E> SingleFlightCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            total_requests: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            coalesced_requests: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Returns the outcome for `key`, computing it if no caller has yet.
    ///
    /// `compute` is called at most once per key over the cache's lifetime,
    /// and only to build the future; it must not do the work itself. All
    /// callers for the key, concurrent or later, receive a clone of the
    /// same `Ok` or `Err`.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let shared = match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                let shared = entry.get().clone();
                if shared.peek().is_some() {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.coalesced_requests.fetch_add(1, Ordering::Relaxed);
                    debug!(key = key, "Joining in-flight computation");
                }
                shared
            }
            Entry::Vacant(entry) => {
                self.computations.fetch_add(1, Ordering::Relaxed);
                debug!(key = key, "Starting computation");
                let shared = compute().boxed().shared();
                entry.insert(shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Returns the resolved outcome for `key` without waiting or computing.
    ///
    /// Returns `None` if the key is unknown or still in flight.
    pub fn peek(&self, key: &str) -> Option<Result<V, E>> {
        self.entries
            .get(key)
            .and_then(|entry| entry.value().peek().cloned())
    }

    /// Returns true if a computation was ever started for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key was ever requested.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            coalesced_requests: self.coalesced_requests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics.
    pub fn log_stats(&self) {
        let stats = self.stats();

        info!(
            total_requests = stats.total_requests,
            computations = stats.computations,
            coalesced = stats.coalesced_requests,
            hits = stats.hits,
            keys = self.len(),
            dedup_ratio = format!("{:.1}%", stats.dedup_ratio() * 100.0),
            "Lookup cache statistics"
        );
    }
}

impl<V, E> Default for SingleFlightCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
