//! HTTP transport for the Semantic Scholar paper search endpoint.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::config::SearchConfig;
use crate::scholar::error::RetrievalError;

/// Paper search path under the Graph API base URL.
const SEARCH_PATH: &str = "graph/v1/paper/search";

/// Longest response body kept in status errors.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Boxed future type for transport operations.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One search request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Maximum number of records.
    pub limit: usize,
    /// Comma separated record fields.
    pub fields: String,
}

/// Status and body of one search response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Build a response from parts.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the service asked the caller to slow down.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Convert a non-success response into an error.
    #[must_use]
    pub fn into_status_error(self) -> RetrievalError {
        RetrievalError::Status {
            status: self.status,
            body: self.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

/// Trait abstraction over the search endpoint.
pub trait SearchTransport: Send + Sync {
    /// Issue a single search request.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    /// Returns an error if no response could be obtained.
    fn fetch<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> TransportFuture<'a, Result<TransportResponse, RetrievalError>>;
}

/// Reqwest-backed transport.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpTransport {
    /// Create a transport from the search configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid, the API key is not a valid
    /// header value, or the client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, RetrievalError> {
        let base_url = normalize_base(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key.trim())?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn build_url(&self, request: &SearchRequest) -> Result<url::Url, RetrievalError> {
        let mut url = self.base_url.join(SEARCH_PATH)?;
        url.query_pairs_mut()
            .append_pair("query", &request.query)
            .append_pair("limit", &request.limit.to_string())
            .append_pair("fields", &request.fields);
        Ok(url)
    }
}

impl SearchTransport for HttpTransport {
    fn fetch<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> TransportFuture<'a, Result<TransportResponse, RetrievalError>> {
        Box::pin(async move {
            let url = self.build_url(request)?;
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, RetrievalError>(TransportResponse { status, body })
        })
    }
}

/// Make sure `Url::join` appends to the base path instead of replacing it.
fn normalize_base(base: &str) -> Result<url::Url, url::ParseError> {
    if base.ends_with('/') {
        url::Url::parse(base)
    } else {
        url::Url::parse(&format!("{base}/"))
    }
}
