//! Provider types and traits

use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur during provider operations.
///
/// Cloneable so that a failed lookup can be recorded once in the
/// single-flight cache and handed to every caller of the same key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Network or HTTP failure (connection error, timeout, non-2xx status)
    #[error("HTTP error: {0}")]
    Transport(String),

    /// The transport succeeded but the payload carried an error code
    #[error("{service} error {code}: {message}")]
    Upstream {
        service: &'static str,
        code: u32,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Parse(String),

    /// Search returned no results
    #[error("No card found for '{0}'")]
    NotFound(String),
}

/// A card record as returned by the card database.
///
/// Only the fields the pipeline and the export need are kept. Localized
/// printings carry `printed_*` fields next to the English oracle fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Card {
    pub name: String,
    pub lang: String,
    pub set: String,
    pub collector_number: String,
    pub cmc: f64,
    pub type_line: String,
    pub oracle_text: String,
    pub printed_name: Option<String>,
    pub printed_type_line: Option<String>,
    pub printed_text: Option<String>,
}

impl Card {
    /// Name as printed on this card, falling back to the oracle name.
    pub fn display_name(&self) -> &str {
        self.printed_name.as_deref().unwrap_or(&self.name)
    }
}

/// Default-language and alternate-language printings of one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPair {
    pub card: Card,
    pub localized: Card,
}

/// Dictionary lookup response.
///
/// Error responses carry `code`/`message` and no definitions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DictionaryEntry {
    pub def: Vec<Definition>,
    pub code: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub text: String,
    pub pos: String,
    /// Transcription
    pub ts: String,
    pub tr: Vec<DictionaryTranslation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DictionaryTranslation {
    pub text: String,
    pub pos: String,
    pub fr: i32,
    pub syn: Vec<Synonym>,
    pub mean: Vec<TextItem>,
    pub ex: Vec<Example>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Synonym {
    pub text: String,
    pub pos: String,
    pub fr: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Example {
    pub text: String,
    pub tr: Vec<TextItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextItem {
    pub text: String,
}

/// Machine translation response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranslationEntry {
    pub translations: Vec<Translation>,
    pub code: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Translation {
    pub text: String,
    pub detected_language_code: String,
}

/// Converts an embedded error code into [`ProviderError::Upstream`].
pub(crate) fn check_embedded_code(
    service: &'static str,
    code: Option<u32>,
    message: Option<&str>,
) -> Result<(), ProviderError> {
    match code {
        Some(code) => Err(ProviderError::Upstream {
            service,
            code,
            message: message.unwrap_or_default().to_string(),
        }),
        None => Ok(()),
    }
}

/// Source of card records.
pub trait CardSource: Send + Sync {
    /// Resolves a card by name into its default and alternate language printings.
    fn lookup_card(&self, name: &str)
        -> impl Future<Output = Result<CardPair, ProviderError>> + Send;
}

/// Source of dictionary entries.
pub trait DictionarySource: Send + Sync {
    /// Looks up a word or phrase.
    ///
    /// Implementations must report an embedded error code as
    /// [`ProviderError::Upstream`], the same as a transport failure.
    fn lookup(&self, word: &str)
        -> impl Future<Output = Result<DictionaryEntry, ProviderError>> + Send;
}

/// Source of machine translations.
pub trait TranslationSource: Send + Sync {
    /// Translates a word or phrase.
    ///
    /// Implementations must report an embedded error code as
    /// [`ProviderError::Upstream`].
    fn translate(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<TranslationEntry, ProviderError>> + Send;
}
