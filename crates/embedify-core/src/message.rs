//! Outgoing message content.
//!
//! A message is a [`MessageChain`]: an ordered list of [`ContentPart`]s.
//! The chain is what a host hands to the pipeline before delivery and what
//! the pipeline hands back to a [`crate::channel::Channel`] for sending.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::card::Embed;

/// One atomic piece of an outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentPart {
    Text(String),
    Image(ImageRef),
    Other(OtherPart),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(reference: impl Into<String>) -> Self {
        Self::Image(ImageRef::new(reference))
    }

    pub fn embed(embed: Embed) -> Self {
        Self::Other(OtherPart::Embed(embed))
    }

    pub fn is_embed(&self) -> bool {
        matches!(self, Self::Other(OtherPart::Embed(_)))
    }
}

/// Content that is neither text nor an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OtherPart {
    /// An already-built card
    Embed(Embed),
    /// Interactive component container placeholder
    View {
        #[serde(default)]
        components: Vec<Value>,
    },
    /// Interactive button placeholder
    Button {
        label: String,
        #[serde(default)]
        custom_id: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    /// Anything the adapter does not know how to fold into a card
    /// (files, audio, mentions, replies, ...)
    Opaque {
        name: String,
        #[serde(default)]
        data: Value,
    },
}

impl OtherPart {
    /// Widget placeholders ride along with a card and never block the
    /// transformation.
    pub fn is_widget(&self) -> bool {
        matches!(self, Self::View { .. } | Self::Button { .. })
    }
}

/// Reference to an image: a remote URL, a `file://` URI, a bare
/// filesystem path, or a host-specific token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL itself when the reference is `http://` or `https://`.
    pub fn remote_url(&self) -> Option<&str> {
        let lower = self.0.get(..8).unwrap_or(&self.0).to_ascii_lowercase();
        (lower.starts_with("http://") || lower.starts_with("https://")).then_some(self.0.as_str())
    }

    pub fn is_file_uri(&self) -> bool {
        self.0.starts_with("file://")
    }

    /// Filesystem path this reference points at, for `file://` URIs and
    /// bare paths. Remote URLs and other schemes yield `None`.
    pub fn local_path(&self) -> Option<PathBuf> {
        if self.is_file_uri() {
            return url::Url::parse(&self.0).ok()?.to_file_path().ok();
        }
        if self.0.is_empty() || self.0.contains("://") {
            return None;
        }
        Some(PathBuf::from(&self.0))
    }

    /// Base name of the local file, if any.
    pub fn file_name(&self) -> Option<String> {
        self.local_path()?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ordered list of content parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain(Vec<ContentPart>);

impl MessageChain {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self(parts)
    }

    /// Chain with no parts. Setting this as an event result suppresses
    /// delivery of the original message.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Chain holding a single text part.
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![ContentPart::text(text)])
    }

    pub fn push(&mut self, part: ContentPart) {
        self.0.push(part);
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_embed(&self) -> bool {
        self.0.iter().any(ContentPart::is_embed)
    }

    pub fn embeds(&self) -> impl Iterator<Item = &Embed> {
        self.0.iter().filter_map(|part| match part {
            ContentPart::Other(OtherPart::Embed(embed)) => Some(embed),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageRef> {
        self.0.iter().filter_map(|part| match part {
            ContentPart::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Concatenated text parts, newline separated.
    pub fn text_content(&self) -> String {
        self.0
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<ContentPart>> for MessageChain {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self(parts)
    }
}
