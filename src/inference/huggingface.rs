// Hugging Face Inference API implementation.
//
// The serverless API answers rate-limit and missing-token conditions with
// an error body rather than a distinct protocol; that text has to reach
// the run loop's pattern classifier, so HTTP error statuses surface their
// body as the response string. Only transport failures become errors.
//
// API docs: https://huggingface.co/docs/api-inference

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::traits::LanguageModel;

/// Serverless inference endpoint; a model id gets appended per request.
pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models";

/// Hosted-model client for the Hugging Face Inference API.
pub struct HfClient {
    client: Client,
    base_url: String,
}

impl HfClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for HfClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl LanguageModel for HfClient {
    async fn generate(
        &self,
        model: &str,
        params: &Map<String, Value>,
        prompt: &str,
        token: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/{}", self.base_url, model);
        let body = json!({
            "inputs": prompt,
            "parameters": params,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to call the inference API")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read the inference API response")?;

        if !status.is_success() {
            debug!(%status, model, "Inference API returned an error body");
            return Ok(error_message(&text));
        }

        Ok(first_candidate(&text))
    }
}

/// Pull the generated text of the first candidate out of the response body.
///
/// The API answers with `[{"generated_text": "..."}]`; anything else is
/// returned verbatim so the caller still sees what the endpoint said.
fn first_candidate(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| value.get(0))
        .and_then(|candidate| candidate.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Unwrap `{"error": "..."}` bodies to the bare message; the rate-limit
/// and access-token phrasings arrive in that field.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
