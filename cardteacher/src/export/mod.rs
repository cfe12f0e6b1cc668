//! Flashcard export.
//!
//! A finished batch is handed to an [`ExportWriter`]. The only writer is
//! [`AnkiTextExporter`], which produces a tab-separated file that Anki's
//! "Import File" dialog understands without any field mapping.

mod anki;

pub use anki::{format_examples, format_header, format_note, AnkiTextExporter, NOTE_COLUMNS};

use thiserror::Error;

use crate::orchestrator::BatchResult;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output directory
    #[error("Failed to create output directory '{path}': {source}")]
    DirectoryError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the output file
    #[error("Failed to write export file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for a successful batch.
pub trait ExportWriter {
    /// Writes every card of the batch.
    fn write(&self, result: &BatchResult) -> Result<(), ExportError>;
}
