//! Prompt construction for relevance judgments.

/// System prompt for the relevance reviewer.
pub const REVIEWER_PREAMBLE: &str = "You are a strict scientific reviewer. \
You judge whether a paper abstract answers a literature search query. \
Reply with a single JSON object and nothing else.";

/// Build the user prompt for one query and abstract.
///
/// The output depends only on its inputs.
#[must_use]
pub fn build_prompt(query: &str, abstract_text: &str) -> String {
    format!(
        r#"Analyze the abstract below for the query: "{query}".

Return a valid JSON object with exactly these keys:
- "score": an integer from 0 to 10 (10 = perfect match).
- "is_relevant": boolean, true if score > 5.
- "evidence": the EXACT sentence copied verbatim from the abstract that justifies the score, or null if there is none.
- "reasoning": a 10-word explanation.

Abstract: {abstract_text}"#
    )
}
