//! Relevance verification of literature search results with an LLM reviewer.
//!
//! Papers are retrieved from Semantic Scholar, each abstract is judged against
//! the query by a Gemini model, and the relevant ones are ranked by score.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(warnings)] // Tous les warnings sont traités comme des erreurs
#![deny(unsafe_code)] // Le code unsafe est interdit
#![deny(missing_docs)] // Toute fonction, struct, enum ou module public doit être documenté
#![deny(dead_code)] // Le code inutilisé est interdit
#![deny(non_camel_case_types)]

// Options supplémentaires pour ne rien laisser passer
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]

// Clippy pour stricte discipline
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)] // Interdit unwrap()
#![deny(clippy::expect_used)] // Interdit expect()
#![deny(clippy::panic)] // Interdit panic!()
#![deny(clippy::print_stdout)] // La sortie passe par `ReportSink`
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)] // Force const lorsque possible
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]

// Lints pour sécurité et robustesse
#![deny(overflowing_literals)]

/// Configuration loading and validation.
#[allow(clippy::module_name_repetitions)]
pub mod config;
/// Pipeline-level errors.
#[allow(clippy::module_name_repetitions)]
pub mod error;
/// LLM relevance scoring.
#[allow(clippy::missing_errors_doc)]
pub mod evaluator;
/// Orchestration, ranking and reporting.
#[allow(clippy::module_name_repetitions)]
pub mod pipeline;
/// Paper search with rate-limit retries.
#[allow(clippy::module_name_repetitions)]
pub mod scholar;
/// Entry helpers for the command line.
pub mod start_paper_verifier;

pub use config::VerifierConfig;
pub use error::{VerifierError, VerifierResult};
pub use evaluator::{Evaluation, EvaluationFailure, Judgment, RelevanceEvaluator};
pub use pipeline::{
    ProgressObserver, ScoredResult, TableReport, VerificationPipeline, VerificationReport,
};
pub use scholar::{Candidate, RetrievalClient, RetrievalError};
