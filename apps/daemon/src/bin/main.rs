//! Typer daemon binary entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use transport::ListenMode;
use typer_daemon::{DaemonConfig, config};

/// Serve generated text over raw TCP.
#[derive(Parser, Debug)]
#[command(name = "typerd", about = "Serve generated text over raw TCP")]
struct Args {
    /// Config file. Defaults to `~/.typer/typer.toml` when it exists.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Bind host, overriding the config file.
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Bind port, overriding the config file.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Serve a single connection, then exit.
    #[arg(long)]
    once: bool,

    /// Write a default config file and exit.
    #[arg(long)]
    init: bool,
}

impl Args {
    fn resolve(&self) -> Result<DaemonConfig> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => Some(config::default_config_path()?).filter(|path| path.exists()),
        };
        let mut config = match path {
            Some(path) => {
                tracing::info!("loading configuration from {}", path.display());
                DaemonConfig::load(&path)?
            }
            None => {
                tracing::info!("no config file found, using defaults");
                DaemonConfig::default()
            }
        };
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.once {
            config.server.mode = ListenMode::Once;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.init {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => config::default_config_path()?,
        };
        config::scaffold_config(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let config = args.resolve()?;
    let handle = typer_daemon::serve_with_config(&config).await?;

    let stats = match config.server.mode {
        ListenMode::Once => handle.finished().await?,
        ListenMode::Loop => {
            tokio::signal::ctrl_c().await?;
            tracing::info!("received ctrl-c, shutting down");
            handle.shutdown().await?
        }
    };
    tracing::info!("typerd exited after {} session(s)", stats.sessions);
    Ok(())
}
