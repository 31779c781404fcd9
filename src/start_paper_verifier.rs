//! Startup helpers for the paper verifier command line.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{SCHOLAR_API_KEY_ENV, VerifierConfig};
use crate::error::{VerifierError, VerifierResult};
use crate::pipeline::{IndicatifProgress, TableReport, VerificationPipeline};

/// Command line overrides applied on top of the environment.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Query to verify.
    pub query: String,
    /// Number of papers requested.
    pub limit: Option<usize>,
    /// Maximum evaluations in flight.
    pub concurrency: Option<usize>,
    /// Gemini model identifier.
    pub model: Option<String>,
    /// Hide the progress bar.
    pub quiet: bool,
}

impl RunOptions {
    /// Apply the overrides to a loaded configuration and re-validate it.
    ///
    /// # Errors
    /// Returns an error if an override makes the configuration invalid.
    pub fn apply(&self, mut config: VerifierConfig) -> VerifierResult<VerifierConfig> {
        if let Some(limit) = self.limit {
            config = config.with_limit(limit);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(model) = &self.model {
            config.llm.model.clone_from(model);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Run one verification and print the table to stdout.
///
/// A `.env` file in the working directory, if present, is loaded before the
/// environment is read. Progress and logs go to stderr.
///
/// # Returns
/// `ExitCode::SUCCESS` when the run completes, `1` on failure.
#[must_use]
pub fn run(options: &RunOptions) -> ExitCode {
    let env_file = dotenvy::dotenv();
    init_tracing();

    tracing::info!("Starting paper verifier v{}", env!("CARGO_PKG_VERSION"));
    match env_file {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env file: {e}"),
    }

    let config = match VerifierConfig::from_env().and_then(|c| options.apply(c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let progress = if options.quiet {
        IndicatifProgress::hidden()
    } else {
        IndicatifProgress::stderr()
    };

    let pipeline = match VerificationPipeline::from_config(&config) {
        Ok(pipeline) => pipeline.with_observer(Arc::new(progress)),
        Err(e) => {
            tracing::error!("Failed to create pipeline: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let mut sink = TableReport::new(std::io::stdout());
    if let Err(e) = rt.block_on(pipeline.run_and_report(&options.query, &mut sink)) {
        report_failure(&e);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn report_failure(error: &VerifierError) {
    tracing::error!(
        stage = error.stage(),
        status = ?error.status(),
        "Verification failed: {error}"
    );
    if error.is_rate_limited() {
        tracing::warn!(
            "Semantic Scholar kept rate limiting; set {SCHOLAR_API_KEY_ENV} for a higher quota"
        );
    }
}

/// Log to stderr so stdout only carries the report.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
