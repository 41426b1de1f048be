//! Generative source: the rolling-context loop around an inference engine.

use crate::{Augment, Identity, InferenceEngine, ResponseSource, SourceError, timing};
use async_stream::try_stream;
use futures_core::Stream;

/// Generated length, in characters, after which a pass stops by default.
pub const DEFAULT_MAX_LENGTH: usize = 2048;

/// Feeds each engine output back in as the next prompt and yields only the
/// newly generated suffix.
///
/// A pass stops on the first step at which the text generated since the
/// reset reaches `max_length` characters. That step's chunk is still
/// yielded. A step that adds nothing also ends the pass.
pub struct Generative<E, A = Identity> {
    engine: E,
    augment: A,
    max_length: usize,
    prompt: Option<String>,
}

impl<E: InferenceEngine> Generative<E> {
    /// Wrap `engine`, starting each pass from the client prompt verbatim.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            augment: Identity,
            max_length: DEFAULT_MAX_LENGTH,
            prompt: None,
        }
    }
}

impl<E: InferenceEngine, A: Augment> Generative<E, A> {
    /// Replace the prompt augmentation policy.
    pub fn augment<B: Augment>(self, augment: B) -> Generative<E, B> {
        Generative {
            engine: self.engine,
            augment,
            max_length: self.max_length,
            prompt: self.prompt,
        }
    }

    /// Set the generated-length bound.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The effective prompt of the next pass, if armed.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}

impl<E: InferenceEngine, A: Augment> ResponseSource for Generative<E, A> {
    fn reset(&mut self, prompt: &str) {
        self.prompt = Some(self.augment.augment(prompt));
    }

    fn resume(&mut self, prompt: &str) {
        self.prompt = Some(prompt.to_owned());
    }

    fn effective_prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    fn chunks(
        &mut self,
    ) -> Result<impl Stream<Item = Result<String, SourceError>> + Send + '_, SourceError> {
        let mut prompt = self.prompt.take().ok_or(SourceError::NotArmed)?;
        let engine = &self.engine;
        let max_length = self.max_length;

        Ok(try_stream! {
            let mut generated = 0;
            let mut steps = 0usize;
            while generated < max_length {
                let output = timing::timed("inference", engine.complete(&prompt))
                    .await
                    .map_err(SourceError::Engine)?;
                let chunk = match output.strip_prefix(prompt.as_str()) {
                    Some(chunk) => chunk.to_owned(),
                    None => Err(SourceError::PrefixMismatch {
                        prompt_len: prompt.len(),
                        output_len: output.len(),
                    })?,
                };
                if chunk.is_empty() {
                    tracing::debug!("engine produced no continuation, ending pass");
                    break;
                }

                generated += chunk.chars().count();
                steps += 1;
                prompt = output;
                yield chunk;
            }
            tracing::debug!(steps, generated, "generation pass finished");
        })
    }
}
