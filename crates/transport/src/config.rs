//! Listener configuration.

use serde::{Deserialize, Serialize};

/// Address the listener binds. Set once and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host name or IP address.
    pub host: String,
    /// TCP port. `0` lets the OS choose.
    pub port: u16,
}

impl ServerConfig {
    /// Create a config for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The `host:port` string passed to bind. IPv6 literals are bracketed.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 6142)
    }
}

/// Whether the listener serves a single connection or keeps accepting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenMode {
    /// Serve one connection to completion, then stop.
    Once,
    /// Serve connections one after another until shut down.
    #[default]
    Loop,
}
