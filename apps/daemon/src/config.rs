//! Daemon configuration loaded from TOML.

use anyhow::{Context, Result};
use model::EngineConfig;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tcore::{Continuation, ReplayMode, source::generative::DEFAULT_MAX_LENGTH};
use transport::{ListenMode, ServerConfig, SessionPolicy};

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "typer.toml";

/// Placeholder emitted by a polling replay once its file is exhausted.
pub const DEFAULT_PLACEHOLDER: &str = "\n";

/// Resolve the global configuration directory (`~/.typer/`).
pub fn global_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".typer"))
        .context("no home directory")
}

/// Default config file path (`~/.typer/typer.toml`).
pub fn default_config_path() -> Result<PathBuf> {
    Ok(global_config_dir()?.join(CONFIG_FILE))
}

/// Top-level daemon configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Listener settings (`[server]`).
    #[serde(default)]
    pub server: ServerSection,
    /// Re-priming settings (`[session]`).
    #[serde(default)]
    pub session: SessionSection,
    /// Response source (`[source]`).
    #[serde(default)]
    pub source: SourceConfig,
}

/// `[server]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host name or IP address to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
    /// `once` or `loop`.
    pub mode: ListenMode,
}

impl Default for ServerSection {
    fn default() -> Self {
        let address = ServerConfig::default();
        Self {
            host: address.host,
            port: address.port,
            mode: ListenMode::default(),
        }
    }
}

impl ServerSection {
    /// The bind address.
    pub fn address(&self) -> ServerConfig {
        ServerConfig::new(self.host.clone(), self.port)
    }
}

/// Named continuation strategy in config.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationKind {
    /// End the session after one pass.
    #[default]
    None,
    /// Re-prime with the previous prompt plus the whole response.
    Rolling,
    /// Re-prime with the last `window_lines` lines of the response.
    Window,
}

/// `[session]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Re-priming strategy.
    pub continuation: ContinuationKind,
    /// Lines kept by the `window` strategy.
    pub window_lines: usize,
    /// Upper bound on passes per session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            continuation: ContinuationKind::None,
            window_lines: Continuation::DEFAULT_WINDOW,
            max_passes: None,
        }
    }
}

impl SessionSection {
    /// The policy handed to every session.
    pub fn policy(&self) -> SessionPolicy {
        let continuation = match self.continuation {
            ContinuationKind::None => None,
            ContinuationKind::Rolling => Some(Continuation::Rolling),
            ContinuationKind::Window => Some(Continuation::Window {
                lines: self.window_lines,
            }),
        };
        SessionPolicy {
            continuation,
            max_passes: self.max_passes,
        }
    }
}

/// `[source]` table, selected by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Replay a file line by line.
    Replay(ReplayConfig),
    /// Generate with an inference engine.
    Generative(GenerativeConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Generative(GenerativeConfig::default())
    }
}

/// Replay mode name in config.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayModeKind {
    /// One traversal of the file.
    #[default]
    Finite,
    /// The file, then the placeholder forever.
    Poll,
}

/// Settings for `kind = "replay"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Line-oriented text file to replay.
    pub file: PathBuf,
    /// Delay before each line, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// `finite` or `poll`.
    #[serde(default)]
    pub mode: ReplayModeKind,
    /// Text repeated after the file in `poll` mode.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl ReplayConfig {
    /// Per-line delay.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Replay mode with its placeholder.
    pub fn replay_mode(&self) -> ReplayMode {
        match self.mode {
            ReplayModeKind::Finite => ReplayMode::Finite,
            ReplayModeKind::Poll => ReplayMode::Poll {
                placeholder: self.placeholder.clone(),
            },
        }
    }
}

fn default_delay_ms() -> u64 {
    tcore::source::replay::DEFAULT_DELAY.as_millis() as u64
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_owned()
}

/// Settings for `kind = "generative"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeConfig {
    /// Generated characters after which a pass stops.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Completions endpoint (`[source.engine]`).
    #[serde(default)]
    pub engine: EngineConfig,
    /// Topic augmentation (`[source.augment]`). Absent means the client
    /// prompt is used verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub augment: Option<AugmentConfig>,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            engine: EngineConfig::default(),
            augment: None,
        }
    }
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

/// `[source.augment]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentConfig {
    /// Template with `{topic}` and `{prompt}` placeholders.
    pub template: String,
    /// Topic list, one per line.
    pub topics_file: PathBuf,
    /// Fixed seed for topic selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DaemonConfig {
    /// Parse a TOML string into a `DaemonConfig`, expanding `${VAR}`
    /// references first.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = crate::utils::expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Write a default `typer.toml` to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn scaffold_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(&DaemonConfig::default())
        .context("failed to serialize default config")?;
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
