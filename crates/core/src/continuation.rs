//! Strategies for re-priming a session once a generation pass ends.
//!
//! These are deliberately distinct: `Rolling` feeds the whole history back
//! and grows without bound, `Window` keeps only the tail of the last
//! response. They produce different generation trajectories and are never
//! substituted for one another.

/// How the next pass's prompt is built from the previous pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Previous prompt followed by the entire previous response.
    Rolling,
    /// Only the last `lines` lines of the previous response, each
    /// terminated by a single newline.
    Window {
        /// Number of trailing lines kept.
        lines: usize,
    },
}

impl Continuation {
    /// Window size used when none is configured.
    pub const DEFAULT_WINDOW: usize = 3;

    /// The bounded strategy with the default three-line window.
    pub fn window() -> Self {
        Self::Window {
            lines: Self::DEFAULT_WINDOW,
        }
    }

    /// Build the prompt for the next pass.
    pub fn next_prompt(&self, prompt: &str, response: &str) -> String {
        match self {
            Self::Rolling => {
                let mut next = String::with_capacity(prompt.len() + response.len());
                next.push_str(prompt);
                next.push_str(response);
                next
            }
            Self::Window { lines } => last_lines(response, *lines),
        }
    }
}

/// The last `n` lines of `text`, in order, each followed by `\n`.
///
/// Fewer than `n` lines yields all of them. Line endings in `text` (`\n` or
/// `\r\n`) are normalised to a single `\n`.
pub fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().fold(String::new(), |mut acc, line| {
        acc.push_str(line);
        acc.push('\n');
        acc
    })
}
