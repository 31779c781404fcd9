//! Filtering and ranking of judged candidates.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::evaluator::Judgment;
use crate::scholar::Candidate;

/// A relevant candidate with the judgment fields that accepted it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Retrieved paper.
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Relevance score in 0..=10.
    pub score: u8,
    /// Verbatim supporting sentence from the abstract.
    pub evidence: Option<String>,
    /// Short explanation from the model.
    pub reasoning: String,
}

impl ScoredResult {
    /// Merge a candidate with its judgment, if the judgment accepts it.
    #[must_use]
    pub fn accept(candidate: Candidate, judgment: Judgment) -> Option<Self> {
        if !judgment.is_relevant {
            return None;
        }
        Some(Self {
            candidate,
            score: judgment.score,
            evidence: judgment.evidence,
            reasoning: judgment.reasoning,
        })
    }
}

/// Order results by descending score, keeping input order among equal scores.
#[must_use]
pub fn rank_results(mut results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    results.sort_by_key(|result| Reverse(result.score));
    results
}
