//! Error types for the retrieval stage.

use thiserror::Error;

/// Errors that can occur while searching for candidate papers.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Rate-limit retries were exhausted.
    #[error("rate limit exceeded after {attempts} attempts")]
    Exhausted {
        /// Number of requests issued before giving up.
        attempts: u32,
    },

    /// The search service answered with a non-retryable status.
    #[error("search service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Search URL could not be built.
    #[error("invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured API key cannot be sent as a header value.
    #[error("invalid Semantic Scholar API key: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
}

impl RetrievalError {
    /// Check if this error came from running out of rate-limit retries.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// HTTP status attached to this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Exhausted { .. } => Some(429),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_reports_rate_limit() {
        let err = RetrievalError::Exhausted { attempts: 5 };
        assert!(err.is_exhausted());
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.to_string(), "rate limit exceeded after 5 attempts");
    }

    #[test]
    fn test_status_error() {
        let err = RetrievalError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!err.is_exhausted());
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_invalid_api_key_has_no_status() {
        let header = reqwest::header::HeaderValue::from_str("bad\nkey");
        assert!(header.is_err());
        let Err(source) = header else { return };
        let err = RetrievalError::from(source);
        assert!(matches!(err, RetrievalError::InvalidApiKey(_)));
        assert_eq!(err.status(), None);
    }
}
