//! Dictionary and translation sources backed by Yandex services.
//!
//! Both services report application errors as a JSON body carrying
//! `code` and `message`, usually alongside a non-2xx status. The body is
//! inspected first so that the embedded code is surfaced as
//! [`ProviderError::Upstream`]; only bodies without a code fall back to the
//! HTTP status.

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::http::{decode_json, AsyncHttpClient, HttpResponse};
use super::types::{
    check_embedded_code, DictionaryEntry, DictionarySource, ProviderError, TranslationEntry,
    TranslationSource,
};

/// Default dictionary API root.
pub const DEFAULT_DICTIONARY_URL: &str = "https://dictionary.yandex.net";

/// Default translation API root.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.api.cloud.yandex.net";

const DICTIONARY_SERVICE: &str = "dictionary";
const TRANSLATE_SERVICE: &str = "translate";

fn parse_base(base_url: &str) -> Result<Url, ProviderError> {
    Url::parse(base_url)
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .ok_or_else(|| ProviderError::Transport(format!("invalid base URL: {}", base_url)))
}

fn join_path(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Decodes a response that may carry an embedded error code.
fn decode_checked<T, F>(
    service: &'static str,
    url: &Url,
    response: &HttpResponse,
    code_of: F,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> (Option<u32>, Option<&str>),
{
    match decode_json::<T>(response) {
        Ok(body) => {
            let (code, message) = code_of(&body);
            check_embedded_code(service, code, message)?;
            if !response.is_success() {
                return Err(ProviderError::Transport(format!(
                    "HTTP {} from {}",
                    response.status, url
                )));
            }
            Ok(body)
        }
        Err(_) if !response.is_success() => Err(ProviderError::Transport(format!(
            "HTTP {} from {}: {}",
            response.status,
            url,
            response.body_text()
        ))),
        Err(e) => Err(e),
    }
}

/// Dictionary lookups (`/api/v1/dicservice.json/lookup`).
pub struct YandexDictionary<C: AsyncHttpClient> {
    http_client: C,
    base_url: Url,
    api_key: String,
    lang_pair: String,
    ui_lang: String,
}

impl<C: AsyncHttpClient> YandexDictionary<C> {
    /// Creates a dictionary source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Service root, see [`DEFAULT_DICTIONARY_URL`]
    /// * `api_key` - Dictionary API key
    /// * `source_lang` / `target_lang` - Language pair, e.g. `en` / `ru`
    pub fn new(
        http_client: C,
        base_url: &str,
        api_key: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client,
            base_url: parse_base(base_url)?,
            api_key: api_key.to_string(),
            lang_pair: format!("{}-{}", source_lang, target_lang),
            ui_lang: target_lang.to_string(),
        })
    }

    fn lookup_url(&self, word: &str) -> Url {
        let mut url = join_path(&self.base_url, &["api", "v1", "dicservice.json", "lookup"]);
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("lang", &self.lang_pair)
            .append_pair("text", word)
            .append_pair("ui", &self.ui_lang);
        url
    }
}

impl<C: AsyncHttpClient> DictionarySource for YandexDictionary<C> {
    async fn lookup(&self, word: &str) -> Result<DictionaryEntry, ProviderError> {
        let url = self.lookup_url(word);
        debug!(word = word, "Dictionary lookup");
        let response = self.http_client.get(url.as_str()).await?;
        decode_checked(DICTIONARY_SERVICE, &url, &response, |e: &DictionaryEntry| {
            (e.code, e.message.as_deref())
        })
    }
}

/// Request body for `translate/v2/translate`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    folder_id: &'a str,
    texts: [&'a str; 1],
    target_language_code: &'a str,
    source_language_code: &'a str,
}

/// Machine translation (`/translate/v2/translate`).
pub struct YandexTranslator<C: AsyncHttpClient> {
    http_client: C,
    url: Url,
    iam_token: String,
    folder_id: String,
    source_lang: String,
    target_lang: String,
}

impl<C: AsyncHttpClient> YandexTranslator<C> {
    /// Creates a translation source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Service root, see [`DEFAULT_TRANSLATE_URL`]
    /// * `iam_token` - Bearer token for the Authorization header
    /// * `folder_id` - Cloud folder the translation is billed to
    /// * `source_lang` / `target_lang` - Language pair, e.g. `en` / `ru`
    pub fn new(
        http_client: C,
        base_url: &str,
        iam_token: &str,
        folder_id: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Self, ProviderError> {
        let base = parse_base(base_url)?;
        Ok(Self {
            http_client,
            url: join_path(&base, &["translate", "v2", "translate"]),
            iam_token: iam_token.to_string(),
            folder_id: folder_id.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        })
    }

    fn request_body(&self, text: &str) -> Result<String, ProviderError> {
        serde_json::to_string(&TranslateRequest {
            folder_id: &self.folder_id,
            texts: [text],
            target_language_code: &self.target_lang,
            source_language_code: &self.source_lang,
        })
        .map_err(|e| ProviderError::Parse(format!("failed to encode request: {}", e)))
    }
}

impl<C: AsyncHttpClient> TranslationSource for YandexTranslator<C> {
    async fn translate(&self, text: &str) -> Result<TranslationEntry, ProviderError> {
        let body = self.request_body(text)?;
        debug!(text = text, "Translation request");
        let response = self
            .http_client
            .post_json_with_bearer(self.url.as_str(), &body, &self.iam_token)
            .await?;
        decode_checked(TRANSLATE_SERVICE, &self.url, &response, |e: &TranslationEntry| {
            (e.code, e.message.as_deref())
        })
    }
}
