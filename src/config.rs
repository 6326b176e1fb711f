use std::env;

/// Central configuration loaded from environment variables.
///
/// The API token comes from the environment (never from flags, so it
/// stays out of shell history). The .env file is loaded automatically at
/// startup via dotenvy.
pub struct Config {
    /// Hugging Face API token. Optional: anonymous calls work but hit
    /// the free rate limit quickly.
    pub api_token: Option<String>,
    /// Inference endpoint base URL (defaults to the serverless API).
    pub api_url: String,
    /// Model queried when no --model flag is given.
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Self {
        Self {
            api_token: env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
            api_url: env::var("PLACARD_API_URL")
                .unwrap_or_else(|_| crate::inference::huggingface::DEFAULT_API_URL.to_string()),
            model: env::var("PLACARD_MODEL")
                .unwrap_or_else(|_| crate::inference::params::DEFAULT_MODEL.to_string()),
        }
    }
}
