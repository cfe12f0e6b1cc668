//! Sliding-window rate limiter.
//!
//! The dictionary and translation services accept a fixed number of requests
//! per second. [`RateLimiter`] admits at most `capacity` calls within any
//! span of length `window`, wherever that span starts.
//!
//! # Implementation
//!
//! The limiter keeps the admission instants of the last `capacity` calls,
//! oldest first, behind a short `parking_lot` mutex. A call is admitted when
//! fewer than `capacity` admissions are younger than `window`; otherwise it
//! waits until the oldest one ages out. Expiry and admission happen in one
//! critical section, so concurrent callers can never over-issue.
//!
//! Waiting callers race the expiry instant against cancellation and re-check
//! after each wake. Waiters are not served in FIFO order.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cardteacher::limiter::RateLimiter;
//! use tokio_util::sync::CancellationToken;
//!
//! let limiter = Arc::new(RateLimiter::new(20, Duration::from_secs(1)));
//! let cancel = CancellationToken::new();
//!
//! limiter.acquire(&cancel).await?;
//! // request happens here
//! ```

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Errors returned by [`RateLimiter::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimiterError {
    /// The caller's cancellation token fired while waiting for a permit
    #[error("permit acquisition cancelled")]
    Cancelled,
}

/// Limiter that admits at most `capacity` calls per sliding window.
#[derive(Debug)]
pub struct RateLimiter {
    /// Permits per window
    capacity: usize,

    /// Window length
    window: Duration,

    /// Admission instants still inside the window, oldest first
    admissions: Mutex<VecDeque<Instant>>,

    /// Total permits handed out (for metrics)
    acquired_total: AtomicU64,

    /// Acquisitions that had to wait for a slot (for metrics)
    delayed_total: AtomicU64,
}

impl RateLimiter {
    /// Creates a limiter with `capacity` permits per `window`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or `window` is zero.
    pub fn new(capacity: usize, window: Duration) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(!window.is_zero(), "window must be > 0");

        Self {
            capacity,
            window,
            admissions: Mutex::new(VecDeque::new()),
            acquired_total: AtomicU64::new(0),
            delayed_total: AtomicU64::new(0),
        }
    }

    /// Waits for a permit and consumes it.
    ///
    /// Returns [`LimiterError::Cancelled`] promptly if `cancel` fires while
    /// waiting; no permit is consumed in that case.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), LimiterError> {
        let mut delayed = false;

        loop {
            if cancel.is_cancelled() {
                return Err(LimiterError::Cancelled);
            }

            let slot_free_at = match self.try_admit(Instant::now()) {
                Ok(()) => {
                    if delayed {
                        self.delayed_total.fetch_add(1, Ordering::Relaxed);
                    }
                    return Ok(());
                }
                Err(slot_free_at) => slot_free_at,
            };
            delayed = true;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    trace!("Rate limiter wait cancelled");
                    return Err(LimiterError::Cancelled);
                }
                _ = tokio::time::sleep_until(slot_free_at) => {}
            }
        }
    }

    /// Consumes a permit if one is free right now.
    pub fn try_acquire(&self) -> bool {
        self.try_admit(Instant::now()).is_ok()
    }

    /// Admits a call at `now`, or returns when the oldest admission expires.
    fn try_admit(&self, now: Instant) -> Result<(), Instant> {
        let mut admissions = self.admissions.lock();
        self.expire(&mut admissions, now);

        if admissions.len() < self.capacity {
            admissions.push_back(now);
            self.acquired_total.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        // Full: the front entry is the capacity-th most recent admission
        Err(admissions
            .front()
            .map_or(now, |oldest| *oldest + self.window))
    }

    fn expire(&self, admissions: &mut VecDeque<Instant>, now: Instant) {
        while admissions
            .front()
            .is_some_and(|oldest| now.saturating_duration_since(*oldest) >= self.window)
        {
            admissions.pop_front();
        }
    }

    /// Returns the number of permits per window.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns the permits that could be taken right now.
    pub fn available_permits(&self) -> usize {
        let mut admissions = self.admissions.lock();
        self.expire(&mut admissions, Instant::now());
        self.capacity - admissions.len()
    }

    /// Returns the total number of permits handed out.
    pub fn acquired_total(&self) -> u64 {
        self.acquired_total.load(Ordering::Relaxed)
    }

    /// Returns the number of acquisitions that had to wait.
    pub fn delayed_total(&self) -> u64 {
        self.delayed_total.load(Ordering::Relaxed)
    }
}
