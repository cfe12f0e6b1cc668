//! cardteacher - vocabulary flashcards from trading card deck lists
//!
//! This library turns a list of card names into flashcards: every card is
//! resolved in two languages, every word on it is looked up in a dictionary
//! and machine-translated, and the result is written as an Anki import file.
//!
//! # High-Level API
//!
//! The [`orchestrator`] module runs a whole deck list concurrently:
//!
//! ```ignore
//! use cardteacher::limiter::RateLimiter;
//! use cardteacher::orchestrator::BatchOrchestrator;
//! use cardteacher::export::AnkiTextExporter;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let limiter = Arc::new(RateLimiter::new(20, Duration::from_secs(1)));
//! let orchestrator = BatchOrchestrator::new(cards, dictionary, translator, limiter);
//! let writer = AnkiTextExporter::new("deck.txt", "MTG Cards");
//! orchestrator.run_and_export(&names, &writer, CancellationToken::new()).await?;
//! ```

pub mod cache;
pub mod config;
pub mod decklist;
pub mod export;
pub mod limiter;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod provider;
pub mod words;

/// Version of the cardteacher library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
