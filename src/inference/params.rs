// Per-model generation parameter defaults and merging.
//
// Defaults live in one explicit table keyed by model id rather than being
// consulted as ambient state; user overrides win on key collision.

use serde_json::{Map, Value};

/// Model queried when the caller doesn't pick one.
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

/// Default generation parameters for `model`.
///
/// Every model gets the shared baseline (enough tokens for a label plus
/// the JSON wrapper, prompt not echoed back); known models can override
/// entries here.
pub fn default_params(model: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("max_new_tokens".to_string(), Value::from(300));
    params.insert("return_full_text".to_string(), Value::from(false));

    match model {
        // The 7B instruct models tend to ramble; a tighter budget keeps
        // answers to the requested label.
        "mistralai/Mistral-7B-Instruct-v0.2" | "HuggingFaceH4/zephyr-7b-beta" => {
            params.insert("max_new_tokens".to_string(), Value::from(100));
        }
        _ => {}
    }

    params
}

/// Model defaults merged with user overrides, overrides winning.
pub fn merge_params(model: &str, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut params = default_params(model);
    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }
    params
}

/// Everything needed to address one hosted model: its id, the effective
/// generation parameters, and an optional API token.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub params: Map<String, Value>,
    pub token: Option<String>,
}

impl ModelConfig {
    pub fn new(
        model: impl Into<String>,
        overrides: &Map<String, Value>,
        token: Option<String>,
    ) -> Self {
        let model = model.into();
        let params = merge_params(&model, overrides);
        Self {
            model,
            params,
            token,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL, &Map::new(), None)
    }
}
