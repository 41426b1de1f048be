//! Sliding window over a stream of lines.
//!
//! Each window starts with the current line and is followed by up to `size`
//! lines of lookahead. Every line is at the front of exactly one window.

use anyhow::Result;
use futures_core::Stream;
use futures_util::StreamExt;
use std::{collections::VecDeque, pin::pin};

/// Sliding window state.
#[derive(Debug, Clone)]
pub struct LineWindow {
    size: usize,
    window: VecDeque<String>,
}

impl LineWindow {
    /// A window showing the current line plus `size` lines of lookahead.
    pub fn new(size: usize) -> Self {
        let mut window = VecDeque::with_capacity(size + 1);
        window.push_back(String::new());
        Self { size, window }
    }

    /// Feed the next line. Returns a snapshot once enough lookahead has
    /// been buffered.
    pub fn push(&mut self, line: String) -> Option<Vec<String>> {
        if self.window.len() <= self.size {
            self.window.push_back(line);
            return None;
        }
        self.window.pop_front();
        self.window.push_back(line);
        Some(self.snapshot())
    }

    /// Drain after the input has ended. Call until it returns `None`.
    pub fn finish(&mut self) -> Option<Vec<String>> {
        self.window.pop_front();
        if self.window.is_empty() {
            None
        } else {
            Some(self.snapshot())
        }
    }

    fn snapshot(&self) -> Vec<String> {
        self.window.iter().cloned().collect()
    }
}

/// Turn a stream of lines into a stream of windows.
pub fn windows<S>(lines: S, size: usize) -> impl Stream<Item = Result<Vec<String>>>
where
    S: Stream<Item = Result<String>>,
{
    async_stream::try_stream! {
        let mut lines = pin!(lines);
        let mut state = LineWindow::new(size);
        while let Some(line) = lines.next().await {
            if let Some(window) = state.push(line?) {
                yield window;
            }
        }
        while let Some(window) = state.finish() {
            yield window;
        }
    }
}
