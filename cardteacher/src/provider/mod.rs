//! External data source abstraction
//!
//! This module provides traits and implementations for the three services a
//! deck build depends on:
//!
//! - [`CardSource`] - card records in two languages ([`ScryfallSource`])
//! - [`DictionarySource`] - dictionary entries ([`YandexDictionary`])
//! - [`TranslationSource`] - machine translations ([`YandexTranslator`])
//!
//! All sources are generic over [`AsyncHttpClient`] so tests can substitute
//! a mock client.
//!
//! ```ignore
//! use cardteacher::provider::{AsyncReqwestClient, ScryfallSource, DEFAULT_SCRYFALL_URL};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let cards = ScryfallSource::new(http_client, DEFAULT_SCRYFALL_URL, "en", "ru")?;
//! let pair = cards.lookup_card("island").await?;
//! ```

mod http;
mod scryfall;
mod types;
mod yandex;

pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpResponse};
pub use scryfall::{ScryfallSource, DEFAULT_SCRYFALL_URL};
pub(crate) use types::check_embedded_code;
pub use types::{
    Card, CardPair, CardSource, Definition, DictionaryEntry, DictionarySource,
    DictionaryTranslation, Example, ProviderError, Synonym, TextItem, Translation,
    TranslationEntry, TranslationSource,
};
pub use yandex::{
    YandexDictionary, YandexTranslator, DEFAULT_DICTIONARY_URL, DEFAULT_TRANSLATE_URL,
};

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, RecordedRequest};
