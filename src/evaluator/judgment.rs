//! Strict relevance judgment parsed from model output.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::evaluator::error::EvaluationFailure;

/// Highest score a judgment may carry.
pub const MAX_SCORE: u8 = 10;

/// Reasoning attached to the fallback judgment.
pub const FALLBACK_REASONING: &str = "Error";

/// Relevance verdict for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    /// Relevance score in 0..=10.
    pub score: u8,
    /// Model verdict, trusted as given.
    pub is_relevant: bool,
    /// Verbatim sentence from the abstract supporting the score.
    pub evidence: Option<String>,
    /// Short explanation.
    pub reasoning: String,
}

impl Judgment {
    /// Judgment used when the model call fails.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            score: 0,
            is_relevant: false,
            evidence: None,
            reasoning: FALLBACK_REASONING.to_string(),
        }
    }

    /// Parse model output for a candidate with the given abstract.
    ///
    /// Evidence that does not appear verbatim in the abstract is dropped.
    ///
    /// # Errors
    /// Returns an error if the text is empty, not the expected JSON object,
    /// or the score is out of range.
    pub fn parse(text: &str, abstract_text: &str) -> Result<Self, EvaluationFailure> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err(EvaluationFailure::EmptyResponse);
        }

        let payload: JudgmentPayload = serde_json::from_str(body)?;
        let score = u8::try_from(payload.score)
            .ok()
            .filter(|score| *score <= MAX_SCORE)
            .ok_or(EvaluationFailure::ScoreOutOfRange(payload.score))?;

        let evidence = payload.evidence.and_then(|evidence| {
            if evidence.trim().is_empty() {
                None
            } else if abstract_text.contains(evidence.as_str()) {
                Some(evidence)
            } else {
                warn!(%evidence, "dropping evidence not found verbatim in abstract");
                None
            }
        });

        Ok(Self {
            score,
            is_relevant: payload.is_relevant,
            evidence,
            reasoning: payload.reasoning,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JudgmentPayload {
    score: i64,
    is_relevant: bool,
    #[serde(default)]
    evidence: Option<String>,
    reasoning: String,
}

/// Remove a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSTRACT: &str = "We estimate the time offset between an IMU and a camera. \
        Cross-correlation of angular velocity gives sub-millisecond accuracy.";

    #[test]
    fn test_parse_valid_judgment() {
        let text = r#"{"score": 8, "is_relevant": true,
            "evidence": "Cross-correlation of angular velocity gives sub-millisecond accuracy.",
            "reasoning": "Directly addresses IMU camera time synchronization."}"#;
        let judgment = Judgment::parse(text, ABSTRACT);
        assert!(judgment.is_ok());
        let Ok(judgment) = judgment else { return };
        assert_eq!(judgment.score, 8);
        assert!(judgment.is_relevant);
        assert!(judgment.evidence.is_some());
    }

    #[test]
    fn test_is_relevant_is_trusted() {
        let text = r#"{"score": 4, "is_relevant": true, "evidence": null, "reasoning": "ok"}"#;
        let judgment = Judgment::parse(text, ABSTRACT).ok();
        assert_eq!(judgment.map(|j| (j.score, j.is_relevant)), Some((4, true)));
    }

    #[test]
    fn test_code_fence_is_tolerated() {
        let text = "```json\n{\"score\": 2, \"is_relevant\": false, \"evidence\": null, \"reasoning\": \"off topic\"}\n```";
        assert!(Judgment::parse(text, ABSTRACT).is_ok());
    }

    #[test]
    fn test_evidence_must_be_verbatim() {
        let text = r#"{"score": 7, "is_relevant": true,
            "evidence": "IMU and camera are synchronized perfectly.",
            "reasoning": "relevant"}"#;
        let judgment = Judgment::parse(text, ABSTRACT).ok();
        assert_eq!(judgment.map(|j| j.evidence), Some(None));

        let blank = r#"{"score": 7, "is_relevant": true, "evidence": "  ", "reasoning": "r"}"#;
        assert_eq!(Judgment::parse(blank, ABSTRACT).ok().map(|j| j.evidence), Some(None));
    }

    #[test]
    fn test_score_out_of_range() {
        let high = r#"{"score": 11, "is_relevant": true, "evidence": null, "reasoning": "r"}"#;
        assert!(matches!(
            Judgment::parse(high, ABSTRACT),
            Err(EvaluationFailure::ScoreOutOfRange(11))
        ));

        let negative = r#"{"score": -1, "is_relevant": false, "evidence": null, "reasoning": "r"}"#;
        assert!(matches!(
            Judgment::parse(negative, ABSTRACT),
            Err(EvaluationFailure::ScoreOutOfRange(-1))
        ));
    }

    #[test]
    fn test_schema_mismatch_fails_closed() {
        let cases = [
            r#"{"score": "8", "is_relevant": true, "evidence": null, "reasoning": "r"}"#,
            r#"{"score": 7.5, "is_relevant": true, "evidence": null, "reasoning": "r"}"#,
            r#"{"score": 8, "evidence": null, "reasoning": "r"}"#,
            r#"{"score": 8, "is_relevant": true, "evidence": null, "reasoning": "r", "extra": 1}"#,
            r#"[{"score": 8}]"#,
            "Sure! Here is the JSON.",
        ];
        for case in cases {
            let result = Judgment::parse(case, ABSTRACT);
            assert!(
                result.as_ref().is_err_and(EvaluationFailure::is_schema_violation),
                "expected schema violation for {case}"
            );
        }
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(
            Judgment::parse("  \n", ABSTRACT),
            Err(EvaluationFailure::EmptyResponse)
        ));
    }

    #[test]
    fn test_fallback() {
        let fallback = Judgment::fallback();
        assert_eq!(fallback.score, 0);
        assert!(!fallback.is_relevant);
        assert_eq!(fallback.evidence, None);
        assert_eq!(fallback.reasoning, "Error");
    }
}
