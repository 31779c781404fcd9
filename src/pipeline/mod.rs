//! Verification pipeline: retrieve, judge each candidate, rank.
//!
//! Retrieval failures abort the run. Evaluation failures are counted and
//! replaced by the non-relevant fallback judgment.

pub mod progress;
pub mod ranking;
pub mod report;

pub use progress::{IndicatifProgress, ProgressObserver};
pub use ranking::{ScoredResult, rank_results};
pub use report::{ReportSink, TableReport, VerificationReport};

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::config::VerifierConfig;
use crate::error::{VerifierError, VerifierResult};
use crate::evaluator::{Evaluation, RelevanceEvaluator};
use crate::scholar::{Candidate, RetrievalClient};

/// Orchestrates retrieval, relevance evaluation and ranking for one query.
pub struct VerificationPipeline {
    retrieval: RetrievalClient,
    evaluator: RelevanceEvaluator,
    limit: usize,
    max_concurrent: usize,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl VerificationPipeline {
    /// Build a pipeline from explicit collaborators.
    #[must_use]
    pub fn new(
        retrieval: RetrievalClient,
        evaluator: RelevanceEvaluator,
        limit: usize,
        max_concurrent: usize,
    ) -> Self {
        Self {
            retrieval,
            evaluator,
            limit,
            max_concurrent: max_concurrent.max(1),
            observer: None,
        }
    }

    /// Report evaluation progress to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build a pipeline talking to Semantic Scholar and Gemini.
    ///
    /// # Errors
    /// Returns a configuration error if the config is invalid or a client
    /// cannot be built. No network call is made.
    pub fn from_config(config: &VerifierConfig) -> VerifierResult<Self> {
        config.validate()?;
        let retrieval = RetrievalClient::new(&config.search)
            .map_err(|e| VerifierError::Configuration(format!("search client: {e}")))?;
        let evaluator = RelevanceEvaluator::from_config(&config.llm)?;
        Ok(Self::new(
            retrieval,
            evaluator,
            config.search.limit,
            config.pipeline.max_concurrent_evaluations,
        ))
    }

    /// Verify `query` and return the ranked report.
    ///
    /// # Errors
    /// Returns [`VerifierError::Retrieval`] if the search fails. Evaluation
    /// failures never fail the run.
    pub async fn run(&self, query: &str) -> VerifierResult<VerificationReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("verify", %run_id, query);
        self.run_inner(run_id, query).instrument(span).await
    }

    /// Verify `query` and hand the report to `sink`.
    ///
    /// # Errors
    /// Returns an error if retrieval fails or the sink cannot write.
    pub async fn run_and_report(
        &self,
        query: &str,
        sink: &mut dyn ReportSink,
    ) -> VerifierResult<VerificationReport> {
        let report = self.run(query).await?;
        sink.deliver(&report)?;
        Ok(report)
    }

    async fn run_inner(&self, run_id: Uuid, query: &str) -> VerifierResult<VerificationReport> {
        let candidates = self
            .retrieval
            .search(query, self.limit)
            .await
            .map_err(|source| VerifierError::Retrieval {
                query: query.to_string(),
                source,
            })?;
        let retrieved = candidates.len();

        info!(retrieved, "verifying papers");
        if let Some(observer) = &self.observer {
            observer.retrieved(retrieved);
        }
        let outcomes = self.evaluate_all(query, candidates).await;
        if let Some(observer) = &self.observer {
            observer.finished();
        }

        let mut evaluation_failures = 0;
        let mut accepted = Vec::new();
        for (candidate, evaluation) in outcomes {
            if evaluation.is_fallback() {
                evaluation_failures += 1;
            }
            if let Some(result) = ScoredResult::accept(candidate, evaluation.judgment) {
                accepted.push(result);
            }
        }

        let results = rank_results(accepted);
        info!(
            relevant = results.len(),
            retrieved, evaluation_failures, "verification finished"
        );

        Ok(VerificationReport {
            run_id,
            query: query.to_string(),
            results,
            retrieved,
            evaluation_failures,
            completed_at: chrono::Utc::now(),
        })
    }

    /// Judge every candidate, at most `max_concurrent` at a time.
    ///
    /// Outcomes come back in retrieval order.
    async fn evaluate_all(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
    ) -> Vec<(Candidate, Evaluation)> {
        stream::iter(candidates)
            .map(|candidate| async move {
                let evaluation = self.evaluator.evaluate(query, &candidate).await;
                (candidate, evaluation)
            })
            .buffered(self.max_concurrent)
            .inspect(|(candidate, evaluation)| {
                if let Some(observer) = &self.observer {
                    observer.evaluated(candidate, evaluation);
                }
            })
            .collect()
            .await
    }
}
