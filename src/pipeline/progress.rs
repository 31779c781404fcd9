//! Progress reporting while candidates are being judged.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::evaluator::Evaluation;
use crate::scholar::Candidate;

/// Template of the evaluation progress bar.
const BAR_TEMPLATE: &str = "{spinner} {msg} [{bar:30}] {pos}/{len} ({elapsed})";

/// Receives progress events from a verification run.
///
/// Events arrive in retrieval order.
pub trait ProgressObserver: Send + Sync {
    /// Retrieval finished with `total` candidates to judge.
    fn retrieved(&self, total: usize);

    /// One candidate was judged.
    fn evaluated(&self, candidate: &Candidate, evaluation: &Evaluation);

    /// Every candidate was judged.
    fn finished(&self) {}
}

/// Terminal progress bar drawn on stderr.
///
/// Nothing is drawn when stderr is not a terminal.
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Create a bar drawing to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Create a bar that never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    /// Number of candidates judged so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Number of candidates to judge.
    #[must_use]
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl ProgressObserver for IndicatifProgress {
    fn retrieved(&self, total: usize) {
        self.bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
        self.bar.set_message("Verifying papers");
    }

    fn evaluated(&self, candidate: &Candidate, evaluation: &Evaluation) {
        if evaluation.is_fallback() {
            self.bar
                .set_message(format!("Fallback for {}", candidate.display_title()));
        }
        self.bar.inc(1);
    }

    fn finished(&self) {
        self.bar.finish_and_clear();
    }
}
