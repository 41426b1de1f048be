//! Deterministic engines for tests.
//!
//! Enabled with the `testing` feature. None of these make network calls.

use crate::InferenceEngine;
use anyhow::{Result, bail};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Appends a fixed suffix to every prompt.
#[derive(Debug, Clone)]
pub struct SuffixEngine {
    suffix: String,
}

impl SuffixEngine {
    /// Create an engine that appends `suffix`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl InferenceEngine for SuffixEngine {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(format!("{prompt}{}", self.suffix))
    }
}

/// Returns canned outputs in order and records every prompt it receives.
///
/// Outputs are returned verbatim, so a script can deliberately break the
/// prefix contract. Running past the end of the script is an error.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    outputs: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    /// Create an engine that answers with `outputs`, one per call.
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: Mutex::new(outputs.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl InferenceEngine for ScriptedEngine {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_owned());
        match self.outputs.lock().pop_front() {
            Some(output) => Ok(output),
            None => bail!("script exhausted"),
        }
    }
}
