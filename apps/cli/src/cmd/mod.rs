//! CLI argument parsing and subcommand dispatch.

use anyhow::Result;
use clap::{Parser, Subcommand};
use transport::ServerConfig;

pub mod practice;
pub mod send;
pub mod watch;

/// Default number of lookahead lines shown by `watch` and `practice`.
pub const DEFAULT_LINES: usize = 10;

/// Client for a Typer server.
#[derive(Parser, Debug)]
#[command(name = "typer", about = "Client for a Typer server")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Server address (host:port). Takes precedence over `--host`/`--port`.
    #[arg(long, global = true)]
    pub addr: Option<String>,

    /// Server host.
    #[arg(long, global = true, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port.
    #[arg(long, global = true, env = "PORT", default_value_t = 6142)]
    pub port: u16,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a prompt and print the response as it streams in.
    Send {
        /// Prompt text.
        prompt: String,
    },
    /// Send a prompt and show the response as a sliding window of lines.
    Watch {
        /// Prompt text.
        prompt: String,
        /// Lookahead lines shown below the current line.
        #[arg(long, short, default_value_t = DEFAULT_LINES)]
        lines: usize,
    },
    /// Send a prompt and practise typing the response line by line.
    Practice {
        /// Prompt text.
        prompt: String,
        /// Lookahead lines shown below the line being typed.
        #[arg(long, short, default_value_t = DEFAULT_LINES)]
        lines: usize,
    },
}

impl Cli {
    /// The server address to connect to.
    pub fn address(&self) -> String {
        match &self.addr {
            Some(addr) => addr.clone(),
            None => ServerConfig::new(self.host.clone(), self.port).address(),
        }
    }

    /// Run the selected subcommand.
    pub async fn run(self) -> Result<()> {
        let addr = self.address();
        match self.command {
            Command::Send { prompt } => send::run(&addr, &prompt).await,
            Command::Watch { prompt, lines } => watch::run(&addr, &prompt, lines).await,
            Command::Practice { prompt, lines } => practice::run(&addr, &prompt, lines).await,
        }
    }
}
