//! TCP client for a Typer server.

use crate::PROMPT_BUFFER;
use anyhow::{Result, bail};
use futures_core::Stream;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpStream, ToSocketAddrs},
};

/// An established connection to a Typer server.
///
/// Not Clone: one connection per prompt. The server closes the connection
/// when its stream ends, which ends the streams returned here.
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    /// Connect to a server at `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        tracing::debug!("connected to {}", stream.peer_addr()?);
        Ok(Self { stream })
    }

    /// Send the prompt that starts generation.
    ///
    /// The server reads the prompt in a single read of at most
    /// [`PROMPT_BUFFER`] bytes, so longer prompts are refused here.
    pub async fn send_prompt(&mut self, prompt: &str) -> Result<()> {
        if prompt.is_empty() {
            bail!("prompt is empty");
        }
        if prompt.len() > PROMPT_BUFFER {
            bail!(
                "prompt is {} bytes, the server reads at most {PROMPT_BUFFER}",
                prompt.len()
            );
        }
        self.stream.write_all(prompt.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Raw bytes as they arrive, until the server closes the connection.
    pub fn bytes(&mut self) -> impl Stream<Item = Result<Vec<u8>>> + '_ {
        async_stream::try_stream! {
            let mut buf = vec![0u8; PROMPT_BUFFER];
            loop {
                let read = self.stream.read(&mut buf).await?;
                if read == 0 {
                    break;
                }
                yield buf[..read].to_vec();
            }
        }
    }

    /// Complete lines, without their terminators, until the server closes
    /// the connection. A trailing partial line is yielded last.
    pub fn lines(&mut self) -> impl Stream<Item = Result<String>> + '_ {
        async_stream::try_stream! {
            let mut lines = BufReader::new(&mut self.stream).lines();
            while let Some(line) = lines.next_line().await? {
                yield line;
            }
        }
    }

    /// Shut down both directions of the connection.
    pub async fn close(mut self) -> Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
