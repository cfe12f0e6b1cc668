//! HTTP client abstraction for testability

use super::types::ProviderError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Raw HTTP response: status code and body.
///
/// Non-2xx responses are returned rather than converted to errors because
/// some services report failures as a JSON body with an error code, which
/// the caller must inspect before falling back to the status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as lossy UTF-8, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Decodes a JSON response body.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    response: &HttpResponse,
) -> Result<T, ProviderError> {
    serde_json::from_slice(&response.body).map_err(|e| {
        ProviderError::Parse(format!(
            "{} (HTTP {}): {}",
            e,
            response.status,
            response.body_text()
        ))
    })
}

/// Trait for asynchronous HTTP client operations.
///
/// Allows the data sources to be exercised against mock clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, ProviderError>> + Send;

    /// Performs an async HTTP POST request with a JSON body and Bearer
    /// token authentication.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `json_body` - JSON body as a string
    /// * `bearer_token` - The bearer token for the Authorization header
    fn post_json_with_bearer(
        &self,
        url: &str,
        json_body: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<HttpResponse, ProviderError>> + Send;
}

/// Default User-Agent string for HTTP requests.
/// The card database asks API clients to identify themselves.
const DEFAULT_USER_AGENT: &str = concat!("cardteacher/", env!("CARGO_PKG_VERSION"));

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with a 30 second timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(30)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                ProviderError::Transport(format!("Failed to create async HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn read_response(
        url: &str,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<HttpResponse, ProviderError> {
        let response = match result {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::Transport(format!("Request failed: {}", e)));
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(HttpResponse {
                    status,
                    body: bytes.to_vec(),
                })
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(ProviderError::Transport(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}

impl Default for AsyncReqwestClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default async HTTP client")
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        trace!(url = url, "HTTP GET request starting");
        let result = self.client.get(url).send().await;
        Self::read_response(url, result).await
    }

    async fn post_json_with_bearer(
        &self,
        url: &str,
        json_body: &str,
        bearer_token: &str,
    ) -> Result<HttpResponse, ProviderError> {
        trace!(url = url, "HTTP POST request starting");
        let result = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .bearer_auth(bearer_token)
            .body(json_body.to_string())
            .send()
            .await;
        Self::read_response(url, result).await
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// A request recorded by [`MockAsyncHttpClient`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: String,
        pub body: Option<String>,
        pub bearer: Option<String>,
    }

    /// Mock async HTTP client for testing.
    ///
    /// Responses are matched by URL prefix, longest prefix first. Unmatched
    /// URLs produce a transport error.
    #[derive(Default)]
    pub struct MockAsyncHttpClient {
        responses: HashMap<String, Result<HttpResponse, ProviderError>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockAsyncHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a 200 response with the given JSON body.
        pub fn with_json(mut self, url_prefix: &str, body: &str) -> Self {
            self.responses.insert(
                url_prefix.to_string(),
                Ok(HttpResponse {
                    status: 200,
                    body: body.as_bytes().to_vec(),
                }),
            );
            self
        }

        /// Registers a response with an explicit status.
        pub fn with_status(mut self, url_prefix: &str, status: u16, body: &str) -> Self {
            self.responses.insert(
                url_prefix.to_string(),
                Ok(HttpResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
            );
            self
        }

        /// Registers a transport failure.
        pub fn with_error(mut self, url_prefix: &str, error: ProviderError) -> Self {
            self.responses.insert(url_prefix.to_string(), Err(error));
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().clone()
        }

        fn respond(&self, request: RecordedRequest) -> Result<HttpResponse, ProviderError> {
            let response = self
                .responses
                .iter()
                .filter(|(prefix, _)| request.url.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| {
                    Err(ProviderError::Transport(format!(
                        "no mock response for {}",
                        request.url
                    )))
                });
            self.requests.lock().push(request);
            response
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
            self.respond(RecordedRequest {
                method: "GET",
                url: url.to_string(),
                body: None,
                bearer: None,
            })
        }

        async fn post_json_with_bearer(
            &self,
            url: &str,
            json_body: &str,
            bearer_token: &str,
        ) -> Result<HttpResponse, ProviderError> {
            self.respond(RecordedRequest {
                method: "POST",
                url: url.to_string(),
                body: Some(json_body.to_string()),
                bearer: Some(bearer_token.to_string()),
            })
        }
    }

    #[test]
    fn test_http_response_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: vec![],
        };
        let not_found = HttpResponse {
            status: 404,
            body: b"missing".to_vec(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
        assert_eq!(not_found.body_text(), "missing");
    }

    #[tokio::test]
    async fn test_mock_matches_longest_prefix() {
        let mock = MockAsyncHttpClient::new()
            .with_json("http://example.com/", "{}")
            .with_status("http://example.com/missing", 404, "{}");

        let found = mock.get("http://example.com/cards").await.unwrap();
        assert_eq!(found.status, 200);

        let missing = mock.get("http://example.com/missing/1").await.unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_unmatched_url_is_transport_error() {
        let mock = MockAsyncHttpClient::new();
        let result = mock.get("http://nowhere.test/").await;
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }

    #[tokio::test]
    async fn test_mock_records_post_body_and_token() {
        let mock = MockAsyncHttpClient::new().with_json("http://example.com/", "{}");
        mock.post_json_with_bearer("http://example.com/translate", "{\"a\":1}", "tok")
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].body.as_deref(), Some("{\"a\":1}"));
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
    }
}
