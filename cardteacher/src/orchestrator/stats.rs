//! Batch run statistics.

use std::time::Duration;
use tracing::info;

use crate::cache::CacheStats;

/// Statistics for one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Number of requested cards
    pub items: usize,
    /// Number of cards that completed
    pub completed: usize,
    /// Wall time of the run
    pub elapsed: Duration,
    /// Lookup cache statistics at the end of the run
    pub cache: CacheStats,
    /// Permits taken from the rate limiter during the run
    pub permits_acquired: u64,
}

impl BatchStats {
    /// Returns completed cards per second.
    pub fn items_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.completed as f64 / secs
        } else {
            0.0
        }
    }

    /// Logs the statistics.
    pub fn log(&self) {
        info!(
            items = self.items,
            completed = self.completed,
            elapsed_ms = self.elapsed.as_millis() as u64,
            lookups = self.cache.computations,
            dedup_ratio = format!("{:.1}%", self.cache.dedup_ratio() * 100.0),
            permits = self.permits_acquired,
            "Batch statistics"
        );
    }
}
