//! Errors raised while producing chunks.

use std::io;

/// Errors a [`crate::ResponseSource`] can raise.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// `chunks` was called before `reset` armed the source.
    #[error("response source iterated before reset")]
    NotArmed,

    /// The engine returned text that does not start with the prompt it was given.
    #[error("engine output does not extend its prompt (prompt {prompt_len} bytes, output {output_len} bytes)")]
    PrefixMismatch {
        /// Byte length of the prompt sent to the engine.
        prompt_len: usize,
        /// Byte length of the text the engine returned.
        output_len: usize,
    },

    /// The engine call itself failed.
    #[error("inference failed: {0}")]
    Engine(anyhow::Error),

    /// Reading an auxiliary file failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
