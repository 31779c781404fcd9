//! Failures of a single relevance judgment.

use std::time::Duration;

use thiserror::Error;

/// Failure while scoring one candidate. Always recovered by the evaluator.
#[derive(Debug, Error)]
pub enum EvaluationFailure {
    /// Completion call failed inside Rig.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),

    /// Model backend failed for another reason.
    #[error("model error: {0}")]
    Model(String),

    /// Model did not answer in time.
    #[error("model timed out after {0:?}")]
    Timeout(Duration),

    /// Model answered with nothing.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// Response is not a judgment object.
    #[error("malformed judgment: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Score is outside 0..=10.
    #[error("score {0} is outside 0..=10")]
    ScoreOutOfRange(i64),
}

impl EvaluationFailure {
    /// Check if the failure came from the response content rather than the call.
    #[must_use]
    pub const fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Self::EmptyResponse | Self::MalformedResponse(_) | Self::ScoreOutOfRange(_)
        )
    }
}
