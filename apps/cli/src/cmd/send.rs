//! One-shot prompt command.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use std::pin::pin;
use tokio::io::AsyncWriteExt;
use transport::Connection;

/// Send `prompt` and copy the response bytes to stdout as they arrive.
pub async fn run(addr: &str, prompt: &str) -> Result<()> {
    let mut conn = Connection::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;
    conn.send_prompt(prompt).await?;

    let mut stdout = tokio::io::stdout();
    let mut total = 0;
    {
        let mut bytes = pin!(conn.bytes());
        loop {
            tokio::select! {
                chunk = bytes.next() => match chunk {
                    Some(chunk) => {
                        let chunk = chunk?;
                        total += chunk.len();
                        stdout.write_all(&chunk).await?;
                        stdout.flush().await?;
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    tracing::debug!("received {total} bytes");
    conn.close().await
}
