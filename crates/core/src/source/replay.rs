//! File-replay source, used to exercise the protocol without a model.

use crate::{ResponseSource, SourceError};
use async_stream::try_stream;
use futures_core::Stream;
use std::{path::PathBuf, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Delay before each replayed line unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// What happens once the file has been replayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplayMode {
    /// Stop after one traversal of the file.
    #[default]
    Finite,
    /// Keep yielding `placeholder` forever after the file ends.
    Poll {
        /// Text emitted on every poll after the file is exhausted.
        placeholder: String,
    },
}

/// Emits the lines of a file with an artificial delay before each one.
///
/// The prompt passed to `reset` is ignored, but a reset is still required
/// before every pass.
#[derive(Debug, Clone)]
pub struct FileReplay {
    path: PathBuf,
    delay: Duration,
    mode: ReplayMode,
    armed: bool,
}

impl FileReplay {
    /// Replay `path` once with the default delay.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delay: DEFAULT_DELAY,
            mode: ReplayMode::Finite,
            armed: false,
        }
    }

    /// Set the delay before each line.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the replay mode.
    pub fn mode(mut self, mode: ReplayMode) -> Self {
        self.mode = mode;
        self
    }
}

impl ResponseSource for FileReplay {
    fn reset(&mut self, prompt: &str) {
        tracing::debug!("replay source armed, ignoring {} byte prompt", prompt.len());
        self.armed = true;
    }

    fn chunks(
        &mut self,
    ) -> Result<impl Stream<Item = Result<String, SourceError>> + Send + '_, SourceError> {
        if !std::mem::take(&mut self.armed) {
            return Err(SourceError::NotArmed);
        }

        let path = self.path.clone();
        let delay = self.delay;
        let mode = self.mode.clone();
        Ok(try_stream! {
            let file = tokio::fs::File::open(&path).await?;
            let mut reader = BufReader::new(file);
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await? == 0 {
                    break;
                }
                tokio::time::sleep(delay).await;
                yield line;
            }

            if let ReplayMode::Poll { placeholder } = mode {
                loop {
                    tokio::time::sleep(delay).await;
                    yield placeholder.clone();
                }
            }
        })
    }
}
