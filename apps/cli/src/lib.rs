//! Typer CLI: send a prompt to a Typer server and print, watch, or
//! practise typing the streamed response.

pub use cmd::{Cli, Command};

pub mod cmd;
pub mod practice;
