//! Inference engines for Typer.
//!
//! The only engine shipped is [`HttpEngine`], which talks to any
//! OpenAI-compatible `/v1/completions` endpoint (Ollama, llama.cpp server,
//! vLLM, hosted APIs).

pub use config::EngineConfig;
pub use http::HttpEngine;
pub use request::{Choice, Completion, Request};
pub use reqwest::{self, Client};

mod config;
mod http;
mod request;
