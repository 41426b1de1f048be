//! Prompt augmentation policies applied when a generative source is reset.

use anyhow::{Context, Result, bail};
use rand::{RngCore, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use std::path::Path;

/// Turns the prompt a client sent into the prompt the engine starts from.
pub trait Augment: Send {
    /// Build the effective starting prompt.
    fn augment(&mut self, prompt: &str) -> String;
}

impl<F> Augment for F
where
    F: FnMut(&str) -> String + Send,
{
    fn augment(&mut self, prompt: &str) -> String {
        self(prompt)
    }
}

/// Passes the client prompt through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Augment for Identity {
    fn augment(&mut self, prompt: &str) -> String {
        prompt.to_owned()
    }
}

/// Fills a template with a topic drawn uniformly at random.
///
/// The template may contain `{topic}` and `{prompt}`; both are replaced on
/// every reset. The random source is injectable so callers can pin the
/// sequence of topics.
pub struct TopicAugment<R = StdRng> {
    template: String,
    topics: Vec<String>,
    rng: R,
}

impl TopicAugment<StdRng> {
    /// Build from a topic list, seeding from `seed` or from the OS.
    pub fn new(template: impl Into<String>, topics: Vec<String>, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(template, topics, rng)
    }

    /// Read topics from a line-oriented file, one per line. Blank lines are
    /// skipped.
    pub fn from_file(template: impl Into<String>, path: &Path, seed: Option<u64>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read topics from {}", path.display()))?;
        let topics = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self::new(template, topics, seed)
    }
}

impl<R: RngCore + Send> TopicAugment<R> {
    /// Build with a caller-supplied random source.
    pub fn with_rng(template: impl Into<String>, topics: Vec<String>, rng: R) -> Result<Self> {
        if topics.is_empty() {
            bail!("topic list is empty");
        }
        Ok(Self {
            template: template.into(),
            topics,
            rng,
        })
    }

    /// The topics this policy draws from.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

impl<R: RngCore + Send> Augment for TopicAugment<R> {
    fn augment(&mut self, prompt: &str) -> String {
        let topic = self
            .topics
            .choose(&mut self.rng)
            .map(String::as_str)
            .unwrap_or_default();
        tracing::debug!("augmenting prompt with topic '{topic}'");
        self.template
            .replace("{topic}", topic)
            .replace("{prompt}", prompt)
    }
}
