//! Error types for the embed pipeline

use thiserror::Error;

/// Marker Discord puts in the body of a 400 response when the payload
/// fails validation (malformed embed image URLs end up here).
pub const INVALID_FORM_BODY: &str = "Invalid Form Body";

/// Failure while delivering a message chain to a channel.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Invalid Form Body: {0}")]
    InvalidFormBody(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Attachment error: {0}")]
    Attachment(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SendError {
    /// Whether the platform rejected the payload itself rather than the
    /// transport failing.
    pub fn is_invalid_form_body(&self) -> bool {
        match self {
            Self::InvalidFormBody(_) => true,
            Self::Api { body, .. } => body.contains(INVALID_FORM_BODY),
            Self::Other(message) => message.contains(INVALID_FORM_BODY),
            _ => false,
        }
    }
}

/// Configuration parse failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
