//! Single-flight lookup cache.
//!
//! Many cards share words ("enter", "creature", "target"), so the same
//! dictionary lookup is requested by several item pipelines at once. The
//! [`SingleFlightCache`] makes sure each key is computed once: the first
//! requester starts the work, everyone else attaches to it.
//!
//! # Architecture
//!
//! ```text
//! Pipeline A ─┐
//!             │                               Compute
//! Pipeline B ─┼──► SingleFlightCache ───────► (one future)
//!             │         │                         │
//! Pipeline C ─┘         │                         │
//!                       ▼                         ▼
//!                 [A, B, C all              [one set of
//!                  receive same              HTTP calls]
//!                  result]◄──────────────────────┘
//! ```
//!
//! # Implementation
//!
//! Uses `DashMap` with the entry API for the atomic "claim or attach"
//! decision, and `futures::future::Shared` so that every caller awaits the
//! same computation. Entries are never evicted; the cache lives for one
//! batch run.

mod single_flight;

pub use single_flight::{CacheStats, SingleFlightCache};
