// Language model trait — the swap-ready abstraction.
//
// One method mirrors the hosted-API interaction: model id, generation
// parameters, prompt, optional token in; the first candidate's text out.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Trait for querying a hosted language model. Implementations must be
/// async because providers sit behind HTTP APIs.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt to `model` and return the generated text of the
    /// first candidate.
    ///
    /// Rate-limit and auth-required answers are expected to come back as
    /// ordinary text (the run loop classifies them); only transport and
    /// protocol failures are errors, and those are fatal to the run.
    async fn generate(
        &self,
        model: &str,
        params: &Map<String, Value>,
        prompt: &str,
        token: Option<&str>,
    ) -> Result<String>;
}
