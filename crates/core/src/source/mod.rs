//! Response sources: the pluggable producers of a session's chunk sequence.

use crate::{Augment, Identity, InferenceEngine, SourceError};
use futures_core::Stream;
use futures_util::future::Either;

pub mod generative;
pub mod replay;

/// Produces the chunks streamed back for one session.
///
/// A source is armed by [`ResponseSource::reset`] and then iterated once
/// with [`ResponseSource::chunks`]. Iterating disarms it, so every pass
/// starts from a fresh reset. The returned stream borrows the source
/// mutably, which makes reset-plus-iteration one exclusive unit.
pub trait ResponseSource: Send {
    /// Arm the source with a starting prompt, discarding any previous one.
    fn reset(&mut self, prompt: &str);

    /// Arm the source with `prompt` exactly as given, skipping any
    /// augmentation `reset` would apply. Used to re-prime a session.
    fn resume(&mut self, prompt: &str) {
        self.reset(prompt);
    }

    /// The prompt the next pass will start from, when the source has one.
    ///
    /// For an armed generative source this is the augmented prompt, which
    /// together with the pass's chunks forms the full generated text.
    fn effective_prompt(&self) -> Option<&str> {
        None
    }

    /// Start the lazy, possibly unbounded chunk sequence.
    ///
    /// Fails with [`SourceError::NotArmed`] if the source has not been
    /// reset since it was built or last iterated.
    fn chunks(
        &mut self,
    ) -> Result<impl Stream<Item = Result<String, SourceError>> + Send + '_, SourceError>;
}

/// The closed set of sources the daemon can serve.
pub enum Source<E, A = Identity> {
    /// Replays a file line by line.
    Replay(replay::FileReplay),
    /// Drives an inference engine in the rolling-context loop.
    Generative(generative::Generative<E, A>),
}

impl<E: InferenceEngine, A: Augment> ResponseSource for Source<E, A> {
    fn reset(&mut self, prompt: &str) {
        match self {
            Self::Replay(source) => source.reset(prompt),
            Self::Generative(source) => source.reset(prompt),
        }
    }

    fn resume(&mut self, prompt: &str) {
        match self {
            Self::Replay(source) => source.resume(prompt),
            Self::Generative(source) => source.resume(prompt),
        }
    }

    fn effective_prompt(&self) -> Option<&str> {
        match self {
            Self::Replay(source) => source.effective_prompt(),
            Self::Generative(source) => source.effective_prompt(),
        }
    }

    fn chunks(
        &mut self,
    ) -> Result<impl Stream<Item = Result<String, SourceError>> + Send + '_, SourceError> {
        Ok(match self {
            Self::Replay(source) => Either::Left(source.chunks()?),
            Self::Generative(source) => Either::Right(source.chunks()?),
        })
    }
}
