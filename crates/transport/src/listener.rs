//! TCP listener with a strictly sequential accept loop.

use crate::{ListenMode, Outcome, ServerConfig, Session, SessionError, SessionPolicy};
use anyhow::{Context, Result};
use std::{io, net::SocketAddr, time::Duration};
use tcore::{ResponseSource, timing};
use tokio::{net::TcpListener, sync::oneshot};

/// Counters collected over the lifetime of a listener.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeStats {
    /// Connections accepted and handed to a session.
    pub sessions: usize,
    /// Sessions whose peer disconnected mid-stream.
    pub disconnected: usize,
    /// Sessions that ended with an error.
    pub failed: usize,
}

impl ServeStats {
    fn record(&mut self, peer: SocketAddr, result: Result<Outcome, SessionError>) {
        self.sessions += 1;
        match result {
            Ok(Outcome::NoPrompt) => {
                tracing::info!("{peer} closed before sending a prompt");
            }
            Ok(Outcome::Exhausted { passes, bytes }) => {
                tracing::info!("served {peer}: {bytes} bytes over {passes} pass(es)");
            }
            Ok(Outcome::Disconnected { passes, bytes }) => {
                self.disconnected += 1;
                tracing::info!("{peer} disconnected after {bytes} bytes over {passes} pass(es)");
            }
            Err(e) => {
                self.failed += 1;
                tracing::error!("session with {peer} failed: {e}");
            }
        }
    }
}

/// First delay after a failed accept.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(10);
/// Upper bound on the delay between failed accepts.
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Delay before retrying after `failures` consecutive failed accepts.
fn accept_backoff(failures: u32) -> Duration {
    ACCEPT_BACKOFF
        .saturating_mul(1u32 << failures.min(16))
        .min(ACCEPT_BACKOFF_MAX)
}

/// A bound TCP listener that serves one session at a time.
pub struct Listener {
    inner: TcpListener,
    mode: ListenMode,
}

impl Listener {
    /// Bind `config`. Failure here is fatal to the caller and is not retried.
    pub async fn bind(config: &ServerConfig, mode: ListenMode) -> Result<Self> {
        let address = config.address();
        let inner = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {address}"))?;
        tracing::info!("listening on {} ({mode:?})", inner.local_addr()?);
        Ok(Self { inner, mode })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// The configured mode.
    pub fn mode(&self) -> ListenMode {
        self.mode
    }

    /// Accept and serve connections until shutdown, or after the first
    /// session in [`ListenMode::Once`].
    ///
    /// Each session runs to completion before the next accept, so chunks of
    /// different connections never interleave and `source` needs no lock.
    /// Session failures are logged and counted; they never stop the loop.
    pub async fn serve<S: ResponseSource>(
        self,
        source: &mut S,
        policy: SessionPolicy,
        mut shutdown: oneshot::Receiver<()>,
    ) -> ServeStats {
        let mut stats = ServeStats::default();
        let mut failures = 0u32;
        loop {
            let (stream, peer) = tokio::select! {
                result = self.inner.accept() => match result {
                    Ok(accepted) => {
                        failures = 0;
                        accepted
                    }
                    Err(e) => {
                        let delay = accept_backoff(failures);
                        failures = failures.saturating_add(1);
                        tracing::warn!("failed to accept connection, retrying in {delay:?}: {e}");
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => continue,
                            _ = &mut shutdown => {
                                tracing::info!("listener shutting down");
                                break;
                            }
                        }
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("listener shutting down");
                    break;
                }
            };

            tracing::info!("accepted connection from {peer}");
            let session = Session::new(source, policy);
            tokio::select! {
                result = timing::timed("session", session.run(stream)) => stats.record(peer, result),
                _ = &mut shutdown => {
                    tracing::info!("listener shutting down mid-session with {peer}");
                    break;
                }
            }

            if self.mode == ListenMode::Once {
                break;
            }
        }
        stats
    }
}
