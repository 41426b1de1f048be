//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default completions endpoint (a local Ollama server).
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434/v1/completions";

/// Connection and sampling settings for an [`crate::HttpEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Full URL of the completions endpoint.
    pub endpoint: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Bearer token. Empty or absent means no `Authorization` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Tokens generated per engine call.
    pub max_tokens: usize,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: "qwen2.5-coder:1.5b".to_owned(),
            api_key: None,
            max_tokens: 32,
            temperature: Some(0.7),
        }
    }
}
