//! Completion model wrapper for Rig + Gemini.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::gemini;

use crate::config::LlmConfig;
use crate::error::{VerifierError, VerifierResult};
use crate::evaluator::error::EvaluationFailure;

/// Boxed future type for model operations.
pub type ModelFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait abstraction over the model that writes judgments.
pub trait JudgmentModel: Send + Sync {
    /// Run one completion and return the raw response text.
    ///
    /// # Errors
    /// Returns an error if the completion call fails.
    fn complete<'a>(
        &'a self,
        preamble: &'a str,
        prompt: &'a str,
    ) -> ModelFuture<'a, Result<String, EvaluationFailure>>;
}

/// Any Rig completion model, asked for JSON output.
#[derive(Clone)]
pub struct RigJudgmentModel<M> {
    model: M,
    temperature: f64,
}

impl<M> RigJudgmentModel<M>
where
    M: CompletionModel,
{
    /// Wrap a Rig completion model.
    #[must_use]
    pub const fn new(model: M, temperature: f64) -> Self {
        Self { model, temperature }
    }
}

impl<M> JudgmentModel for RigJudgmentModel<M>
where
    M: CompletionModel + Send + Sync,
{
    fn complete<'a>(
        &'a self,
        preamble: &'a str,
        prompt: &'a str,
    ) -> ModelFuture<'a, Result<String, EvaluationFailure>> {
        Box::pin(async move {
            let request = self
                .model
                .completion_request(prompt.to_string())
                .preamble(preamble.to_string())
                .temperature(self.temperature)
                .additional_params(json_response_params())
                .build();

            let response = self.model.completion(request).await?;
            Ok::<_, EvaluationFailure>(extract_text(&response.choice))
        })
    }
}

/// Build the Gemini-backed judgment model from config.
///
/// # Errors
/// Returns an error if the Gemini client cannot be built.
pub fn gemini_model(config: &LlmConfig) -> VerifierResult<Arc<dyn JudgmentModel>> {
    let builder = gemini::Client::<ReqwestClient>::builder().api_key(config.api_key.clone());
    let builder = if let Some(base_url) = &config.base_url {
        builder.base_url(base_url)
    } else {
        builder
    };
    let client = builder
        .build()
        .map_err(|e| VerifierError::Configuration(format!("gemini client: {e}")))?;
    let model = client.completion_model(config.model.clone());
    Ok(Arc::new(RigJudgmentModel::new(model, config.temperature)))
}

/// Generation settings asking Gemini for a JSON payload.
fn json_response_params() -> serde_json::Value {
    serde_json::json!({
        "generationConfig": {
            "responseMimeType": "application/json"
        }
    })
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
