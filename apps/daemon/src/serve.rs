//! Shared serve entrypoint used by the binary and tests.

use crate::{DaemonConfig, builder::build_source};
use anyhow::Result;
use std::{net::SocketAddr, path::Path};
use tcore::ResponseSource;
use tokio::{sync::oneshot, task::JoinHandle};
use transport::{ListenMode, Listener, ServeStats, SessionPolicy};

/// Handle returned by [`serve_with_config`]: the bound address and the
/// shutdown trigger.
pub struct ServeHandle {
    /// The address the listener is bound to.
    pub addr: SocketAddr,
    /// Send a value to trigger graceful shutdown.
    shutdown_tx: Option<oneshot::Sender<()>>,
    /// Join handle for the listener task.
    join: JoinHandle<ServeStats>,
}

impl ServeHandle {
    /// Wait for the listener to stop on its own. In once mode this happens
    /// after the first session.
    pub async fn finished(self) -> Result<ServeStats> {
        Ok(self.join.await?)
    }

    /// Trigger graceful shutdown and wait for the listener to stop.
    pub async fn shutdown(mut self) -> Result<ServeStats> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.finished().await
    }
}

/// Load config from `path` and start serving.
pub async fn serve(path: &Path) -> Result<ServeHandle> {
    let config = DaemonConfig::load(path)?;
    tracing::info!("loaded configuration from {}", path.display());
    serve_with_config(&config).await
}

/// Build the source, bind the listener, and start serving in the background.
pub async fn serve_with_config(config: &DaemonConfig) -> Result<ServeHandle> {
    let source = build_source(&config.source)?;
    serve_source(source, config, config.session.policy()).await
}

/// Serve an already-built source with the `[server]` settings of `config`.
pub async fn serve_source<S>(
    mut source: S,
    config: &DaemonConfig,
    policy: SessionPolicy,
) -> Result<ServeHandle>
where
    S: ResponseSource + 'static,
{
    let mode: ListenMode = config.server.mode;
    let listener = Listener::bind(&config.server.address(), mode).await?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        let stats = listener.serve(&mut source, policy, shutdown_rx).await;
        tracing::info!(
            "served {} session(s), {} disconnected, {} failed",
            stats.sessions,
            stats.disconnected,
            stats.failed
        );
        stats
    });

    Ok(ServeHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        join,
    })
}
