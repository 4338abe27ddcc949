//! CLI configuration file support
//!
//! Loads configuration from ~/.config/embedify/config.toml

use embedify_core::AdapterConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Pipeline settings
    #[serde(default)]
    pub adapter: AdapterConfig,
    /// Discord credentials
    #[serde(default)]
    pub discord: DiscordSection,
}

/// Discord configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordSection {
    /// Bot token
    pub bot_token: Option<String>,
    /// Default channel id for `send`
    pub channel_id: Option<String>,
}

impl CliConfig {
    /// Load configuration from the given path or the default one
    pub fn load(path: Option<PathBuf>) -> Self {
        Self::load_from_path(path.or_else(Self::default_path))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring malformed config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("embedify").join("config.toml"))
    }
}
