//! Embed payload and its Discord JSON form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::theme::Category;

/// Discord limit for embed titles (characters).
pub const MAX_TITLE_LEN: usize = 256;
/// Discord limit for embed descriptions (characters).
pub const MAX_DESCRIPTION_LEN: usize = 4096;

const ELLIPSIS: &str = "...";

/// A single name/value row of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Structured card sent in place of plain text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed with the theme color of `category`.
    pub fn themed(category: Category) -> Self {
        Self::new().with_color(category.color())
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::themed(Category::Info)
            .with_title(title)
            .with_description(description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::themed(Category::Success)
            .with_title(title)
            .with_description(description)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::themed(Category::Warning)
            .with_title(title)
            .with_description(description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::themed(Category::Error)
            .with_title(title)
            .with_description(description)
    }

    /// Set the title. Whitespace is trimmed, the result is capped at
    /// [`MAX_TITLE_LEN`] characters and an empty title is dropped.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        let capped: String = title.trim().chars().take(MAX_TITLE_LEN).collect();
        let capped = capped.trim_end();
        self.title = (!capped.is_empty()).then(|| capped.to_string());
        self
    }

    /// Set the description, truncating past [`MAX_DESCRIPTION_LEN`].
    /// An empty description is dropped.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty())
            .then(|| truncate_with_ellipsis(&description, MAX_DESCRIPTION_LEN));
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Append a field row.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    /// Render as a Discord embed object.
    pub fn to_discord_json(&self) -> Value {
        let mut embed = Map::new();
        if let Some(title) = &self.title {
            embed.insert("title".into(), json!(title));
        }
        if let Some(description) = &self.description {
            embed.insert("description".into(), json!(description));
        }
        if let Some(color) = self.color {
            embed.insert("color".into(), json!(color));
        }
        if let Some(url) = &self.url {
            embed.insert("url".into(), json!(url));
        }
        if let Some(timestamp) = &self.timestamp {
            embed.insert("timestamp".into(), json!(timestamp.to_rfc3339()));
        }
        if let Some(footer) = &self.footer {
            embed.insert("footer".into(), json!({ "text": footer }));
        }
        if let Some(image) = &self.image {
            embed.insert("image".into(), json!({ "url": image }));
        }
        if let Some(thumbnail) = &self.thumbnail {
            embed.insert("thumbnail".into(), json!({ "url": thumbnail }));
        }
        if !self.fields.is_empty() {
            let fields: Vec<Value> = self
                .fields
                .iter()
                .map(|f| json!({ "name": f.name, "value": f.value, "inline": f.inline }))
                .collect();
            embed.insert("fields".into(), Value::Array(fields));
        }
        Value::Object(embed)
    }
}

/// Cut `text` to at most `max_chars` characters, replacing the tail with
/// `...` when it is too long.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
