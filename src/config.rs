//! Configuration for the verification pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{VerifierError, VerifierResult};
use crate::scholar::RetryPolicy;

/// Environment variable holding the Gemini API key (required).
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the Gemini model.
pub const MODEL_ENV: &str = "PAPER_VERIFIER_MODEL";
/// Environment variable overriding the Gemini endpoint.
pub const GEMINI_BASE_URL_ENV: &str = "GEMINI_BASE_URL";
/// Environment variable holding an optional Semantic Scholar API key.
pub const SCHOLAR_API_KEY_ENV: &str = "SEMANTIC_SCHOLAR_API_KEY";
/// Environment variable overriding the Semantic Scholar endpoint.
pub const SCHOLAR_URL_ENV: &str = "SEMANTIC_SCHOLAR_URL";
/// Environment variable overriding the number of papers requested.
pub const LIMIT_ENV: &str = "PAPER_VERIFIER_LIMIT";
/// Environment variable overriding evaluation fan-out.
pub const CONCURRENCY_ENV: &str = "PAPER_VERIFIER_CONCURRENCY";

/// Largest page the paper search endpoint accepts.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Top-level configuration for a verification run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Paper search settings.
    pub search: SearchConfig,
    /// Relevance model settings.
    pub llm: LlmConfig,
    /// Pipeline scheduling settings.
    pub pipeline: PipelineConfig,
}

impl VerifierConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if `GEMINI_API_KEY` is missing or a value is invalid.
    pub fn from_env() -> VerifierResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns an error if the API key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> VerifierResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get(GEMINI_API_KEY_ENV).ok_or_else(|| {
            VerifierError::Configuration(format!("{GEMINI_API_KEY_ENV} is not set"))
        })?;

        let mut config = Self::default();
        config.llm.api_key = api_key;

        if let Some(model) = get(MODEL_ENV) {
            config.llm.model = model;
        }
        config.llm.base_url = get(GEMINI_BASE_URL_ENV);
        config.search.api_key = get(SCHOLAR_API_KEY_ENV);
        if let Some(url) = get(SCHOLAR_URL_ENV) {
            config.search.base_url = url;
        }
        if let Some(limit) = get(LIMIT_ENV) {
            config.search.limit = parse_number(LIMIT_ENV, &limit)?;
        }
        if let Some(concurrency) = get(CONCURRENCY_ENV) {
            config.pipeline.max_concurrent_evaluations =
                parse_number(CONCURRENCY_ENV, &concurrency)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the Gemini API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm.api_key = key.into();
        self
    }

    /// Set the number of papers requested per search.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.search.limit = limit;
        self
    }

    /// Set the maximum number of evaluations in flight.
    #[must_use]
    pub const fn with_concurrency(mut self, max: usize) -> Self {
        self.pipeline.max_concurrent_evaluations = max;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> VerifierResult<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(VerifierError::Configuration(format!(
                "{GEMINI_API_KEY_ENV} is not set"
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(VerifierError::Configuration(
                "llm.model must not be empty".to_string(),
            ));
        }

        if self.search.limit == 0 || self.search.limit > MAX_SEARCH_LIMIT {
            return Err(VerifierError::Configuration(format!(
                "search.limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }

        if self.search.retry.max_attempts == 0 {
            return Err(VerifierError::Configuration(
                "search.retry.max_attempts must be > 0".to_string(),
            ));
        }

        if self.pipeline.max_concurrent_evaluations == 0 {
            return Err(VerifierError::Configuration(
                "pipeline.max_concurrent_evaluations must be > 0".to_string(),
            ));
        }

        Url::parse(&self.search.base_url)?;

        if let Some(base_url) = &self.llm.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// Semantic Scholar search settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Graph API base URL.
    pub base_url: String,
    /// Number of papers requested per search.
    pub limit: usize,
    /// Comma separated fields requested for each paper.
    pub fields: String,
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Optional API key sent as `x-api-key`.
    pub api_key: Option<String>,
    /// Rate-limit retry policy.
    pub retry: RetryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.semanticscholar.org".to_string(),
            limit: 10,
            fields: "title,abstract,year,url,paperId".to_string(),
            request_timeout: Duration::from_secs(20),
            api_key: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl SearchConfig {
    /// Point the client at another search endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the Semantic Scholar API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Relevance model settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Optional endpoint override.
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Upper bound for one relevance call.
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash-lite".to_string(),
            base_url: None,
            temperature: 0.0,
            timeout: Duration::from_mins(1),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Pipeline scheduling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of relevance calls in flight; 1 evaluates sequentially.
    pub max_concurrent_evaluations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_evaluations: 1,
        }
    }
}

fn parse_number(key: &str, value: &str) -> VerifierResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| VerifierError::Configuration(format!("{key} must be a number, got {value:?}")))
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
