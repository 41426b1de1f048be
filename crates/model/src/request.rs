//! OpenAI-compatible text completion request and response bodies.

use serde::{Deserialize, Serialize};

/// Text completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request<'r> {
    /// The model identifier.
    pub model: &'r str,
    /// The text to continue.
    pub prompt: &'r str,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Always `false`: the engine returns whole steps.
    pub stream: bool,
}

/// Text completion response body. Only the fields Typer reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    /// Completion choices, the first of which is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Completion {
    /// Text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.text.as_str())
    }
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated continuation, without the prompt.
    pub text: String,
    /// Why generation stopped, if reported.
    #[serde(default)]
    pub finish_reason: Option<String>,
}
