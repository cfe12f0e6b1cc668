//! Card database source backed by the Scryfall REST API.
//!
//! Resolving a card takes three requests:
//! 1. `GET cards/search?q=<name>&include_multilingual=true&order=cmc` and
//!    take the first hit
//! 2. `GET cards/<set>/<collector_number>/<alternate_lang>`
//! 3. `GET cards/<set>/<collector_number>/<default_lang>`
//!
//! The two printing requests fetch the same card in both languages so the
//! export can show the localized name next to the English one.

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::http::{decode_json, AsyncHttpClient, HttpResponse};
use super::types::{Card, CardPair, CardSource, ProviderError};

/// Default API root.
pub const DEFAULT_SCRYFALL_URL: &str = "https://api.scryfall.com/";

/// Search result page; only the first card is used.
#[derive(Debug, Deserialize)]
struct CardList {
    #[serde(default)]
    data: Vec<Card>,
}

/// Error object returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    code: String,
    details: String,
}

/// Scryfall-backed [`CardSource`].
pub struct ScryfallSource<C: AsyncHttpClient> {
    http_client: C,
    base_url: Url,
    default_lang: String,
    alternate_lang: String,
}

impl<C: AsyncHttpClient> ScryfallSource<C> {
    /// Creates a source rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] if `base_url` is not a valid
    /// absolute URL.
    pub fn new(
        http_client: C,
        base_url: &str,
        default_lang: &str,
        alternate_lang: &str,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ProviderError::Transport(format!("invalid base URL: {}", base_url)))?;

        Ok(Self {
            http_client,
            base_url,
            default_lang: default_lang.to_string(),
            alternate_lang: alternate_lang.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn search_url(&self, name: &str) -> Url {
        let mut url = self.endpoint(&["cards", "search"]);
        url.query_pairs_mut()
            .append_pair("q", name)
            .append_pair("page", "1")
            .append_pair("include_multilingual", "true")
            .append_pair("order", "cmc");
        url
    }

    fn printing_url(&self, card: &Card, lang: &str) -> Url {
        self.endpoint(&["cards", &card.set, &card.collector_number, lang])
    }

    async fn search_first(&self, name: &str) -> Result<Card, ProviderError> {
        let url = self.search_url(name);
        let response = self.http_client.get(url.as_str()).await?;

        if response.status == 404 {
            return Err(ProviderError::NotFound(name.to_string()));
        }
        ensure_success(&url, &response)?;

        let list: CardList = decode_json(&response)?;
        list.data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    async fn fetch_printing(&self, card: &Card, lang: &str) -> Result<Card, ProviderError> {
        let url = self.printing_url(card, lang);
        let response = self.http_client.get(url.as_str()).await?;
        ensure_success(&url, &response)?;
        decode_json(&response)
    }
}

fn ensure_success(url: &Url, response: &HttpResponse) -> Result<(), ProviderError> {
    if response.is_success() {
        return Ok(());
    }
    let details = serde_json::from_slice::<ApiError>(&response.body)
        .map(|e| format!("{}: {}", e.code, e.details))
        .unwrap_or_else(|_| response.body_text());
    Err(ProviderError::Transport(format!(
        "HTTP {} from {}: {}",
        response.status, url, details
    )))
}

impl<C: AsyncHttpClient> CardSource for ScryfallSource<C> {
    async fn lookup_card(&self, name: &str) -> Result<CardPair, ProviderError> {
        let found = self.search_first(name).await?;
        debug!(
            name = name,
            set = %found.set,
            collector_number = %found.collector_number,
            "Card search hit"
        );

        let localized = self.fetch_printing(&found, &self.alternate_lang).await?;
        let card = self.fetch_printing(&found, &self.default_lang).await?;

        Ok(CardPair { card, localized })
    }
}
