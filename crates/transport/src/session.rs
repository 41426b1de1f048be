//! Per-connection session: read the prompt, drive the source, write chunks.

use futures_util::StreamExt;
use std::{io, pin::pin};
use tcore::{Continuation, ResponseSource, SourceError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Size of the single read that carries the prompt.
///
/// Prompts longer than this are truncated to what the first read returns;
/// the remainder is never reassembled.
pub const PROMPT_BUFFER: usize = 4096;

/// How a session behaves once a pass of its source is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Strategy used to re-prime the source. `None` ends the session after
    /// the first pass.
    pub continuation: Option<Continuation>,
    /// Upper bound on passes when re-priming. `None` keeps going until the
    /// peer disconnects or a pass produces nothing.
    pub max_passes: Option<usize>,
}

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The peer closed before sending a prompt.
    NoPrompt,
    /// The source finished and no further pass was due.
    Exhausted {
        /// Passes completed.
        passes: usize,
        /// Chunk bytes written.
        bytes: usize,
    },
    /// The peer went away mid-stream.
    Disconnected {
        /// Passes started, including the interrupted one.
        passes: usize,
        /// Chunk bytes written before the failure.
        bytes: usize,
    },
}

/// Errors that end a session abnormally.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The response source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A transport failure other than the peer disconnecting.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// Drives one connection with exclusive access to a response source.
pub struct Session<'s, S> {
    source: &'s mut S,
    policy: SessionPolicy,
}

enum Pass {
    Done,
    Disconnected,
}

impl<'s, S: ResponseSource> Session<'s, S> {
    /// Create a session over `source`.
    pub fn new(source: &'s mut S, policy: SessionPolicy) -> Self {
        Self { source, policy }
    }

    /// Serve `conn` until the source is done or the peer disconnects.
    ///
    /// The connection is shut down and dropped on every path, including
    /// errors. A disconnecting peer is reported as [`Outcome::Disconnected`],
    /// not as an error.
    pub async fn run<C>(mut self, mut conn: C) -> Result<Outcome, SessionError>
    where
        C: AsyncRead + AsyncWrite + Unpin,
    {
        let result = self.drive(&mut conn).await;
        match conn.shutdown().await {
            Err(e) if !is_disconnect(&e) => {
                tracing::warn!("failed to shut down connection: {e}");
            }
            _ => {}
        }
        result
    }

    async fn drive<C>(&mut self, conn: &mut C) -> Result<Outcome, SessionError>
    where
        C: AsyncRead + AsyncWrite + Unpin,
    {
        let mut buf = vec![0u8; PROMPT_BUFFER];
        let read = match conn.read(&mut buf).await {
            Ok(read) => read,
            Err(e) if is_disconnect(&e) => 0,
            Err(e) => return Err(e.into()),
        };
        if read == 0 {
            return Ok(Outcome::NoPrompt);
        }
        let mut prompt = String::from_utf8_lossy(&buf[..read]).into_owned();
        tracing::debug!("read {read} byte prompt");

        let mut passes = 0;
        let mut bytes = 0;
        self.source.reset(&prompt);
        loop {
            passes += 1;

            let keep = self.policy.continuation.is_some();
            let start = match self.source.effective_prompt() {
                Some(effective) if keep => effective.to_owned(),
                _ => prompt,
            };
            let mut response = String::new();
            let pass = {
                let mut chunks = pin!(self.source.chunks()?);
                loop {
                    let Some(chunk) = chunks.next().await else {
                        break Pass::Done;
                    };
                    let chunk = chunk?;
                    match write_chunk(conn, &chunk).await {
                        Ok(()) => {}
                        Err(e) if is_disconnect(&e) => break Pass::Disconnected,
                        Err(e) => return Err(e.into()),
                    }
                    bytes += chunk.len();
                    if keep {
                        response.push_str(&chunk);
                    }
                }
            };

            if let Pass::Disconnected = pass {
                tracing::debug!("peer disconnected after {bytes} bytes");
                return Ok(Outcome::Disconnected { passes, bytes });
            }

            let Some(strategy) = self.policy.continuation else {
                break;
            };
            if self.policy.max_passes.is_some_and(|max| passes >= max) {
                break;
            }
            if response.is_empty() {
                tracing::debug!("pass produced nothing, not re-priming");
                break;
            }
            prompt = strategy.next_prompt(&start, &response);
            tracing::debug!("re-priming with {} byte prompt", prompt.len());
            self.source.resume(&prompt);
        }

        Ok(Outcome::Exhausted { passes, bytes })
    }
}

async fn write_chunk<C: AsyncWrite + Unpin>(conn: &mut C, chunk: &str) -> io::Result<()> {
    conn.write_all(chunk.as_bytes()).await?;
    conn.flush().await
}

/// Whether `e` means the peer has gone away.
pub(crate) fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
    )
}
