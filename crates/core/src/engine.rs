//! The inference seam.

use anyhow::Result;

/// A text-continuation capability.
///
/// Given a prompt, an engine returns the prompt followed by its
/// continuation. Calls carry no state between them and may take seconds.
/// Constructors are inherent methods on each engine, never called
/// polymorphically.
pub trait InferenceEngine: Send + Sync {
    /// Continue `prompt`. The returned text must start with `prompt`.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
