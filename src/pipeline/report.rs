//! Verification report and the tabular sink that renders it.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::ranking::ScoredResult;

/// Characters of the title shown in the table.
const TITLE_WIDTH: usize = 50;
/// Width of the score column.
const SCORE_WIDTH: usize = 5;

/// Outcome of one verification run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Identifier of the run, used in logs.
    pub run_id: Uuid,
    /// Query that was verified.
    pub query: String,
    /// Relevant papers, best first.
    pub results: Vec<ScoredResult>,
    /// Number of candidates returned by retrieval.
    pub retrieved: usize,
    /// Number of candidates whose judgment fell back after a failure.
    pub evaluation_failures: usize,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
}

impl VerificationReport {
    /// Number of relevant papers.
    #[must_use]
    pub const fn relevant(&self) -> usize {
        self.results.len()
    }

    /// Whether no paper survived verification.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Consumer of finished reports.
pub trait ReportSink: Send {
    /// Deliver one report.
    ///
    /// # Errors
    /// Returns an error if the report cannot be written.
    fn deliver(&mut self, report: &VerificationReport) -> std::io::Result<()>;
}

/// Renders reports as a plain-text table.
pub struct TableReport<W> {
    out: W,
}

impl<W: Write> TableReport<W> {
    /// Render into `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ReportSink for TableReport<W> {
    fn deliver(&mut self, report: &VerificationReport) -> std::io::Result<()> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Verified Evidence for: {}", report.query)?;
        writeln!(
            out,
            "{:^SCORE_WIDTH$} | {:<title_width$} | Extracted Evidence",
            "Score",
            "Title",
            title_width = TITLE_WIDTH + 3,
        )?;
        writeln!(out, "{}", "-".repeat(SCORE_WIDTH + TITLE_WIDTH + 30))?;

        if report.is_empty() {
            writeln!(out, "No relevant papers found.")?;
        }

        for result in &report.results {
            let evidence = result
                .evidence
                .as_deref()
                .map_or_else(|| "No direct quote".to_string(), |e| format!("\"{e}\""));
            writeln!(
                out,
                "{:^SCORE_WIDTH$} | {:<title_width$} | {}",
                result.score,
                truncate_title(result.candidate.display_title()),
                evidence,
                title_width = TITLE_WIDTH + 3,
            )?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "Summary: Filtered {} relevant papers from {} raw results ({} evaluation failures).",
            report.relevant(),
            report.retrieved,
            report.evaluation_failures
        )?;
        out.flush()
    }
}

/// Cut a title to the column width, marking the cut with an ellipsis.
fn truncate_title(title: &str) -> String {
    let mut short: String = title.chars().take(TITLE_WIDTH).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scholar::Candidate;

    fn report(results: Vec<ScoredResult>) -> VerificationReport {
        VerificationReport {
            run_id: Uuid::new_v4(),
            query: "IMU camera sync".to_string(),
            results,
            retrieved: 4,
            evaluation_failures: 1,
            completed_at: Utc::now(),
        }
    }

    fn scored(title: &str, score: u8, evidence: Option<&str>) -> ScoredResult {
        ScoredResult {
            candidate: Candidate {
                paper_id: None,
                title: Some(title.to_string()),
                abstract_text: "abstract".to_string(),
                year: None,
                url: None,
            },
            score,
            evidence: evidence.map(String::from),
            reasoning: "r".to_string(),
        }
    }

    fn render(report: &VerificationReport) -> String {
        let mut sink = TableReport::new(Vec::new());
        assert!(sink.deliver(report).is_ok());
        String::from_utf8(sink.into_inner()).unwrap_or_default()
    }

    #[test]
    fn test_table_rows_and_summary() {
        let long_title = "A".repeat(80);
        let text = render(&report(vec![
            scored(&long_title, 9, Some("abstract")),
            scored("Short", 7, None),
        ]));

        assert!(text.contains("Verified Evidence for: IMU camera sync"));
        assert!(text.contains(&format!("{}...", "A".repeat(TITLE_WIDTH))));
        assert!(!text.contains(&"A".repeat(TITLE_WIDTH + 1)));
        assert!(text.contains("\"abstract\""));
        assert!(text.contains("No direct quote"));
        assert!(text.contains(
            "Summary: Filtered 2 relevant papers from 4 raw results (1 evaluation failures)."
        ));

        let nine = text.find(" 9 ").unwrap_or(usize::MAX);
        let seven = text.find(" 7 ").unwrap_or(0);
        assert!(nine < seven);
    }

    #[test]
    fn test_empty_report() {
        let text = render(&report(Vec::new()));
        assert!(text.contains("No relevant papers found."));
        assert!(text.contains("Filtered 0 relevant papers"));
    }

    #[test]
    fn test_truncate_title_multibyte() {
        let title = "é".repeat(60);
        assert_eq!(truncate_title(&title).chars().count(), TITLE_WIDTH + 3);
    }
}
