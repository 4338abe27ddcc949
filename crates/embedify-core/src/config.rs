//! Adapter configuration.
//!
//! Everything has a default, so an empty document is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Language used for the strings the adapter writes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Fallback title when the message has no title line.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::En => "Message",
            Self::Zh => "消息",
        }
    }

    /// The word shown in error card titles and the plain-text fallback.
    pub fn error_word(&self) -> &'static str {
        match self {
            Self::En => "Error",
            Self::Zh => "错误",
        }
    }

    pub fn region_unsupported(&self) -> &'static str {
        match self {
            Self::En => {
                "This API service is not available in the current region. Check your network settings or use a VPN."
            }
            Self::Zh => "当前地区不支持访问此API服务。请检查您的网络设置或使用VPN。",
        }
    }

    pub fn invalid_form_body(&self) -> &'static str {
        match self {
            Self::En => {
                "The message format is invalid. Check that the content meets Discord's requirements."
            }
            Self::Zh => "消息格式无效。请检查消息内容是否符合Discord的要求。",
        }
    }
}

/// Settings for [`crate::pipeline::EmbedHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Platform name events must carry to be transformed
    pub platform: String,
    /// Language for generated strings
    pub locale: Locale,
    /// Stamp embeds with the send time
    pub timestamp: bool,
    /// Add a "via {sender}" footer when the sender name is known
    pub sender_footer: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            platform: "discord".to_string(),
            locale: Locale::default(),
            timestamp: true,
            sender_footer: true,
        }
    }
}

impl AdapterConfig {
    /// Parse a TOML document.
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
