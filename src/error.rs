//! Pipeline-level error type.

use thiserror::Error;

use crate::scholar::RetrievalError;

/// Errors that abort a verification run.
///
/// Per-candidate evaluation failures never show up here; they are absorbed
/// by the evaluator.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// Missing or invalid configuration, raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Retrieval failed; no report is produced.
    #[error("retrieval failed for query {query:?}: {source}")]
    Retrieval {
        /// Query being verified.
        query: String,
        /// Underlying retrieval failure.
        #[source]
        source: RetrievalError,
    },

    /// The report sink could not write the report.
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

impl VerifierError {
    /// Name of the pipeline stage that failed.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Retrieval { .. } => "retrieval",
            Self::Report(_) => "report",
        }
    }

    /// HTTP status reported by the search service, if the run failed on one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Retrieval { source, .. } => source.status(),
            Self::Configuration(_) | Self::Report(_) => None,
        }
    }

    /// Check if the run failed because the search service kept rate limiting.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Retrieval {
                source: RetrievalError::Exhausted { .. },
                ..
            }
        )
    }
}

impl From<url::ParseError> for VerifierError {
    fn from(value: url::ParseError) -> Self {
        Self::Configuration(format!("invalid URL: {value}"))
    }
}

/// Convenience result alias for pipeline operations.
pub type VerifierResult<T> = Result<T, VerifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_carries_context() {
        let err = VerifierError::Retrieval {
            query: "X".to_string(),
            source: RetrievalError::Exhausted { attempts: 5 },
        };
        assert_eq!(err.stage(), "retrieval");
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));
        assert_eq!(
            err.to_string(),
            "retrieval failed for query \"X\": rate limit exceeded after 5 attempts"
        );
    }

    #[test]
    fn test_configuration_stage() {
        let err = VerifierError::Configuration("GEMINI_API_KEY is not set".to_string());
        assert_eq!(err.stage(), "configuration");
        assert!(!err.is_rate_limited());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_status_error_is_not_rate_limited() {
        let err = VerifierError::Retrieval {
            query: "X".to_string(),
            source: RetrievalError::Status {
                status: 403,
                body: "forbidden".to_string(),
            },
        };
        assert!(!err.is_rate_limited());
        assert_eq!(err.status(), Some(403));
    }
}
