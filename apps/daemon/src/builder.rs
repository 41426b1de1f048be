//! Source builder: constructs the configured response source.

use crate::config::{AugmentConfig, SourceConfig};
use anyhow::{Context, Result};
use model::{Client, HttpEngine};
use tcore::{Augment, FileReplay, Generative, Source, TopicAugment};

/// The source the daemon serves.
pub type DaemonSource = Source<HttpEngine, StartPrompt>;

/// How the generative source turns a client prompt into its first prompt.
pub enum StartPrompt {
    /// Use the client prompt as-is.
    Verbatim,
    /// Fill the configured template with a random topic.
    Topics(TopicAugment),
}

impl Augment for StartPrompt {
    fn augment(&mut self, prompt: &str) -> String {
        match self {
            Self::Verbatim => prompt.to_owned(),
            Self::Topics(topics) => topics.augment(prompt),
        }
    }
}

impl StartPrompt {
    /// Build from an optional `[source.augment]` table.
    pub fn from_config(config: Option<&AugmentConfig>) -> Result<Self> {
        let Some(config) = config else {
            return Ok(Self::Verbatim);
        };
        let topics = TopicAugment::from_file(config.template.clone(), &config.topics_file, config.seed)?;
        tracing::info!(
            "augmenting prompts with {} topics from {}",
            topics.topics().len(),
            config.topics_file.display()
        );
        Ok(Self::Topics(topics))
    }
}

/// Build the configured source. Any failure here is fatal to startup.
pub fn build_source(config: &SourceConfig) -> Result<DaemonSource> {
    let source = match config {
        SourceConfig::Replay(replay) => {
            if !replay.file.is_file() {
                anyhow::bail!("replay file {} does not exist", replay.file.display());
            }
            tracing::info!("replaying {} ({:?})", replay.file.display(), replay.mode);
            Source::Replay(
                FileReplay::new(replay.file.clone())
                    .delay(replay.delay())
                    .mode(replay.replay_mode()),
            )
        }
        SourceConfig::Generative(generative) => {
            let engine = HttpEngine::new(Client::new(), &generative.engine)
                .context("failed to build inference engine")?;
            tracing::info!(
                "generating with {} at {}",
                generative.engine.model,
                engine.endpoint()
            );
            let augment = StartPrompt::from_config(generative.augment.as_ref())?;
            Source::Generative(
                Generative::new(engine)
                    .augment(augment)
                    .max_length(generative.max_length),
            )
        }
    };
    Ok(source)
}
