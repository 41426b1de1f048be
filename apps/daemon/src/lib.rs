//! Typer daemon: loads `typer.toml`, builds the response source, and serves
//! it over TCP one session at a time.

pub mod builder;
pub mod config;
pub mod serve;
pub mod utils;

pub use builder::{DaemonSource, StartPrompt, build_source};
pub use config::DaemonConfig;
pub use serve::{ServeHandle, serve, serve_source, serve_with_config};
