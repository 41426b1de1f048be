//! Core abstractions for Typer: the inference seam, response sources, and
//! the continuation strategies that carry context between generation calls.

pub use {
    augment::{Augment, Identity, TopicAugment},
    continuation::Continuation,
    engine::InferenceEngine,
    error::SourceError,
    source::{
        ResponseSource, Source,
        generative::Generative,
        replay::{FileReplay, ReplayMode},
    },
};

pub mod augment;
pub mod continuation;
pub mod engine;
mod error;
pub mod source;
pub mod timing;

#[cfg(feature = "testing")]
pub mod testing;
