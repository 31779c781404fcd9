//! Binary entrypoint that verifies literature search results for one query.

use std::process::ExitCode;

use clap::Parser;
use paper_verifier::start_paper_verifier::{self, RunOptions};

/// Search Semantic Scholar and keep only papers an LLM judges relevant.
#[derive(Debug, Parser)]
#[command(name = "paper-verifier", version)]
struct Cli {
    /// Free-text literature query.
    query: String,
    /// Number of papers to request (1-100).
    #[arg(short, long)]
    limit: Option<usize>,
    /// Maximum relevance calls in flight.
    #[arg(short, long)]
    concurrency: Option<usize>,
    /// Gemini model identifier.
    #[arg(short, long)]
    model: Option<String>,
    /// Hide the progress bar.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    start_paper_verifier::run(&RunOptions {
        query: cli.query,
        limit: cli.limit,
        concurrency: cli.concurrency,
        model: cli.model,
        quiet: cli.quiet,
    })
}
