//! LLM-based relevance scoring of candidate papers.
//!
//! - `judgment`: strict judgment schema and fallback
//! - `prompt`: deterministic reviewer prompt
//! - `model`: model seam and the Rig/Gemini implementation
//! - `error`: per-candidate failures, always recovered

pub mod error;
pub mod judgment;
pub mod model;
pub mod prompt;

pub use error::EvaluationFailure;
pub use judgment::Judgment;
pub use model::{JudgmentModel, ModelFuture, RigJudgmentModel, gemini_model};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::VerifierResult;
use crate::scholar::Candidate;

/// Outcome of judging one candidate.
#[derive(Debug)]
pub struct Evaluation {
    /// Judgment used for ranking; the fallback when `failure` is set.
    pub judgment: Judgment,
    /// Why the model's answer could not be used.
    pub failure: Option<EvaluationFailure>,
}

impl Evaluation {
    /// Whether the judgment is the fallback rather than the model's answer.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Scores candidates against a query with a language model.
#[derive(Clone)]
pub struct RelevanceEvaluator {
    model: Arc<dyn JudgmentModel>,
    timeout: Duration,
}

impl RelevanceEvaluator {
    /// Create an evaluator around an explicit model.
    #[must_use]
    pub const fn new(model: Arc<dyn JudgmentModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Create an evaluator backed by Gemini.
    ///
    /// # Errors
    /// Returns an error if the Gemini client cannot be built.
    pub fn from_config(config: &LlmConfig) -> VerifierResult<Self> {
        Ok(Self::new(gemini_model(config)?, config.timeout))
    }

    /// Judge one candidate, reporting any failure to the caller.
    ///
    /// # Errors
    /// Returns an error if the model call fails, times out, or answers with
    /// something that is not a valid judgment.
    pub async fn try_evaluate(
        &self,
        query: &str,
        candidate: &Candidate,
    ) -> Result<Judgment, EvaluationFailure> {
        let prompt = prompt::build_prompt(query, &candidate.abstract_text);
        let call = self.model.complete(prompt::REVIEWER_PREAMBLE, &prompt);
        let text = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| EvaluationFailure::Timeout(self.timeout))??;

        let judgment = Judgment::parse(&text, &candidate.abstract_text)?;
        debug!(
            title = candidate.display_title(),
            score = judgment.score,
            is_relevant = judgment.is_relevant,
            "candidate judged"
        );
        Ok(judgment)
    }

    /// Judge one candidate, falling back to a non-relevant judgment on failure.
    ///
    /// The failure, if any, is kept next to the fallback so callers can count it.
    pub async fn evaluate(&self, query: &str, candidate: &Candidate) -> Evaluation {
        match self.try_evaluate(query, candidate).await {
            Ok(judgment) => Evaluation {
                judgment,
                failure: None,
            },
            Err(err) => {
                warn!(
                    title = candidate.display_title(),
                    schema_violation = err.is_schema_violation(),
                    error = %err,
                    "evaluation failed, using fallback judgment"
                );
                Evaluation {
                    judgment: Judgment::fallback(),
                    failure: Some(err),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Model answering from a closure over the prompt.
    pub(crate) struct FnModel<F>(pub(crate) F);

    impl<F> JudgmentModel for FnModel<F>
    where
        F: Fn(&str) -> Result<String, EvaluationFailure> + Send + Sync,
    {
        fn complete<'a>(
            &'a self,
            _preamble: &'a str,
            prompt: &'a str,
        ) -> ModelFuture<'a, Result<String, EvaluationFailure>> {
            let result = (self.0)(prompt);
            Box::pin(async move { result })
        }
    }

    /// Model that never answers.
    struct StalledModel;

    impl JudgmentModel for StalledModel {
        fn complete<'a>(
            &'a self,
            _preamble: &'a str,
            _prompt: &'a str,
        ) -> ModelFuture<'a, Result<String, EvaluationFailure>> {
            Box::pin(std::future::pending::<Result<String, EvaluationFailure>>())
        }
    }

    pub(crate) fn candidate(abstract_text: &str) -> Candidate {
        Candidate {
            paper_id: None,
            title: Some("A paper".to_string()),
            abstract_text: abstract_text.to_string(),
            year: None,
            url: None,
        }
    }

    fn evaluator<F>(f: F) -> RelevanceEvaluator
    where
        F: Fn(&str) -> Result<String, EvaluationFailure> + Send + Sync + 'static,
    {
        RelevanceEvaluator::new(Arc::new(FnModel(f)), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_evaluate_parses_judgment() {
        let evaluator = evaluator(|prompt| {
            assert!(prompt.contains("\"X\""));
            Ok(r#"{"score": 9, "is_relevant": true, "evidence": "Sensors align.", "reasoning": "match"}"#
                .to_string())
        });

        let evaluation = evaluator.evaluate("X", &candidate("Sensors align. More text.")).await;
        assert!(!evaluation.is_fallback());
        assert_eq!(evaluation.judgment.score, 9);
        assert_eq!(evaluation.judgment.evidence.as_deref(), Some("Sensors align."));
    }

    #[tokio::test]
    async fn test_model_error_falls_back() {
        let evaluator = evaluator(|_| Err(EvaluationFailure::Model("boom".to_string())));
        let candidate = candidate("Some abstract.");

        let result = evaluator.try_evaluate("X", &candidate).await;
        assert!(matches!(result, Err(EvaluationFailure::Model(_))));

        let evaluation = evaluator.evaluate("X", &candidate).await;
        assert_eq!(evaluation.judgment, Judgment::fallback());
        assert!(matches!(evaluation.failure, Some(EvaluationFailure::Model(_))));
        assert!(evaluation.failure.is_some_and(|f| !f.is_schema_violation()));
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back() {
        let evaluator = evaluator(|_| Ok("not json".to_string()));
        let evaluation = evaluator.evaluate("X", &candidate("Some abstract.")).await;
        assert_eq!(evaluation.judgment, Judgment::fallback());
        assert!(evaluation.failure.is_some_and(|f| f.is_schema_violation()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let evaluator =
            RelevanceEvaluator::new(Arc::new(StalledModel), Duration::from_mins(1));
        let candidate = candidate("Some abstract.");

        let result = evaluator.try_evaluate("X", &candidate).await;
        assert!(matches!(result, Err(EvaluationFailure::Timeout(_))));

        let evaluation = evaluator.evaluate("X", &candidate).await;
        assert!(evaluation.is_fallback());
        assert!(!evaluation.judgment.is_relevant);
    }
}
