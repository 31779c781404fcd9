//! Paper retrieval from the Semantic Scholar Graph API.
//!
//! This module provides:
//! - `RetrievalClient`: rate-limit aware search returning scoring candidates
//! - `SearchTransport`: the HTTP seam, with a reqwest implementation
//! - `RetryPolicy` and `Sleeper`: bounded exponential backoff

pub mod error;
pub mod retry;
pub mod transport;
pub mod types;

pub use error::RetrievalError;
pub use retry::{RetryPolicy, SleepFuture, Sleeper, TokioSleeper};
pub use transport::{
    HttpTransport, SearchRequest, SearchTransport, TransportFuture, TransportResponse,
};
pub use types::Candidate;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use types::SearchPage;

/// Search client that turns raw search results into scoring candidates.
pub struct RetrievalClient {
    transport: Arc<dyn SearchTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    fields: String,
}

impl RetrievalClient {
    /// Create a client that talks to the configured search service.
    ///
    /// # Errors
    /// Returns an error if the HTTP transport cannot be created.
    pub fn new(config: &SearchConfig) -> Result<Self, RetrievalError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(TokioSleeper),
            config,
        ))
    }

    /// Create a client from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        transport: Arc<dyn SearchTransport>,
        sleeper: Arc<dyn Sleeper>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            transport,
            sleeper,
            policy: config.retry,
            fields: config.fields.clone(),
        }
    }

    /// Search for papers matching `query`, keeping only those with an abstract.
    ///
    /// Rate-limited responses are retried per the retry policy; any other
    /// failure is returned immediately.
    ///
    /// # Errors
    /// Returns [`RetrievalError::Exhausted`] once every attempt was rate
    /// limited, or the first non-retryable failure.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, RetrievalError> {
        info!(query, limit, "searching Semantic Scholar");

        let request = SearchRequest {
            query: query.to_string(),
            limit,
            fields: self.fields.clone(),
        };

        let mut attempt = 0;
        loop {
            let response = self.transport.fetch(&request).await?;

            if response.is_rate_limited() {
                if !self.policy.has_next(attempt) {
                    return Err(RetrievalError::Exhausted {
                        attempts: attempt + 1,
                    });
                }
                let wait = self.policy.backoff(attempt);
                warn!(attempt, wait_secs = wait.as_secs(), "rate limited, retrying");
                self.sleeper.sleep(wait).await;
                attempt += 1;
                continue;
            }

            if !response.is_success() {
                return Err(response.into_status_error());
            }

            let page: SearchPage = serde_json::from_str(&response.body)?;
            return Ok(filter_candidates(page));
        }
    }
}

/// Drop raw records without an abstract.
fn filter_candidates(page: SearchPage) -> Vec<Candidate> {
    let raw_count = page.data.len();
    debug!(raw_count, total = ?page.total, "search returned raw results");

    let candidates: Vec<Candidate> = page
        .data
        .into_iter()
        .filter_map(Candidate::from_raw)
        .collect();

    info!(
        kept = candidates.len(),
        dropped = raw_count - candidates.len(),
        "found papers with abstracts"
    );
    candidates
}
