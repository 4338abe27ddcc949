//! Channel identifiers.

use serde::{Deserialize, Serialize};

/// Channel type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Discord,
    Console,
}

impl ChannelType {
    /// Platform name carried by events delivered through this channel
    pub fn platform_id(&self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Console => "console",
        }
    }

    /// Display name for logs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Discord => "Discord",
            Self::Console => "Console",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
