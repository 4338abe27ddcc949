//! Discord channel implementation.
//!
//! Sends message chains through the REST API. Embeds go into the `embeds`
//! array, local images are uploaded as multipart attachments so that
//! `attachment://<name>` references inside embeds resolve, and remote images
//! ride along as image-only embeds.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::traits::Channel;
use super::types::ChannelType;
use crate::card::truncate_with_ellipsis;
use crate::error::{INVALID_FORM_BODY, SendError};
use crate::message::{ContentPart, MessageChain, OtherPart};

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const DISCORD_MAX_MESSAGE_LEN: usize = 2000;
/// Discord accepts at most ten embeds per message.
const DISCORD_MAX_EMBEDS: usize = 10;

/// Discord channel configuration.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub api_base: String,
}

/// A local file to upload alongside the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub path: PathBuf,
    pub filename: String,
}

/// Request body for one `POST /channels/{id}/messages` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscordPayload {
    pub json: Value,
    pub uploads: Vec<PendingUpload>,
}

/// Discord channel that sends via REST API.
pub struct DiscordChannel {
    config: DiscordConfig,
    client: Client,
}

impl DiscordChannel {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self::new(DiscordConfig {
            bot_token: token.to_string(),
            api_base: DISCORD_API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.api_base = api_base.into();
        self
    }

    /// Translate a chain into Discord's message body.
    pub fn build_payload(chain: &MessageChain) -> DiscordPayload {
        let mut texts = Vec::new();
        let mut embeds = Vec::new();
        let mut uploads = Vec::new();

        for part in chain.parts() {
            match part {
                ContentPart::Text(text) => texts.push(text.as_str()),
                ContentPart::Image(image) => {
                    if let Some(url) = image.remote_url() {
                        embeds.push(json!({ "image": { "url": url } }));
                    } else if let (Some(path), Some(filename)) =
                        (image.local_path(), image.file_name())
                    {
                        uploads.push(PendingUpload { path, filename });
                    } else {
                        debug!(reference = %image.as_str(), "Skipping unsupported image reference");
                    }
                }
                ContentPart::Other(OtherPart::Embed(embed)) => embeds.push(embed.to_discord_json()),
                ContentPart::Other(other) => {
                    debug!(part = ?other, "Discord payload ignores component");
                }
            }
        }

        if embeds.len() > DISCORD_MAX_EMBEDS {
            warn!(count = embeds.len(), "Dropping embeds over the Discord limit");
            embeds.truncate(DISCORD_MAX_EMBEDS);
        }

        let mut body = serde_json::Map::new();
        let content = texts.join("\n");
        if !content.is_empty() {
            body.insert(
                "content".into(),
                json!(truncate_with_ellipsis(&content, DISCORD_MAX_MESSAGE_LEN)),
            );
        }
        if !embeds.is_empty() {
            body.insert("embeds".into(), Value::Array(embeds));
        }
        if !uploads.is_empty() {
            let attachments: Vec<Value> = uploads
                .iter()
                .enumerate()
                .map(|(id, upload)| json!({ "id": id, "filename": upload.filename }))
                .collect();
            body.insert("attachments".into(), Value::Array(attachments));
        }

        DiscordPayload {
            json: Value::Object(body),
            uploads,
        }
    }

    async fn build_form(payload: DiscordPayload) -> Result<Form, SendError> {
        let mut form = Form::new().text("payload_json", payload.json.to_string());
        for (index, upload) in payload.uploads.into_iter().enumerate() {
            let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
                SendError::Attachment(format!("cannot read '{}': {}", upload.path.display(), e))
            })?;
            let part = Part::bytes(bytes)
                .file_name(upload.filename)
                .mime_str("application/octet-stream")?;
            form = form.part(format!("files[{}]", index), part);
        }
        Ok(form)
    }

    fn classify_failure(status: u16, body: String) -> SendError {
        if status == 400 && body.contains(INVALID_FORM_BODY) {
            SendError::InvalidFormBody(body)
        } else {
            SendError::Api { status, body }
        }
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Discord
    }

    fn is_configured(&self) -> bool {
        !self.config.bot_token.is_empty()
    }

    async fn send(&self, conversation_id: &str, chain: MessageChain) -> Result<(), SendError> {
        if !self.is_configured() {
            return Err(SendError::NotConfigured(self.name().to_string()));
        }

        let payload = Self::build_payload(&chain);
        if payload.json.as_object().is_some_and(|body| body.is_empty()) && payload.uploads.is_empty()
        {
            debug!(conversation_id, "Nothing to send to Discord");
            return Ok(());
        }

        let request = self
            .client
            .post(format!(
                "{}/channels/{}/messages",
                self.config.api_base, conversation_id
            ))
            .header("Authorization", format!("Bot {}", self.config.bot_token));

        let request = if payload.uploads.is_empty() {
            request.json(&payload.json)
        } else {
            request.multipart(Self::build_form(payload).await?)
        };

        let resp = request.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("Discord send failed ({}): {}", status, body);
            return Err(Self::classify_failure(status, body));
        }

        debug!(conversation_id, "Discord message delivered");
        Ok(())
    }
}
