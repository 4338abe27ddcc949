//! Host-facing event interface.
//!
//! A host fires [`crate::pipeline::EmbedHandler::on_before_send`] with an
//! event implementing [`MessageEvent`] right before it would deliver the
//! pending result. [`OutboundEvent`] is a ready-made implementation backed
//! by a [`Channel`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::channel::Channel;
use crate::error::SendError;
use crate::message::MessageChain;

/// An outgoing message the host is about to deliver.
#[async_trait]
pub trait MessageEvent: Send + Sync {
    /// Platform identifier, e.g. `discord`
    fn platform_name(&self) -> &str;

    /// Pending outgoing content, if any
    fn result(&self) -> Option<&MessageChain>;

    /// Display name of the sender. Hosts may fail to look it up.
    fn sender_name(&self) -> anyhow::Result<Option<String>>;

    /// Send a chain to the conversation this event belongs to
    async fn send(&self, chain: MessageChain) -> Result<(), SendError>;

    /// Replace the pending outgoing content
    fn set_result(&mut self, chain: MessageChain);
}

/// Event bound to a channel and conversation.
pub struct OutboundEvent {
    platform: String,
    conversation_id: String,
    sender_name: Option<String>,
    result: Option<MessageChain>,
    channel: Arc<dyn Channel>,
}

impl OutboundEvent {
    /// Create an event for `conversation_id`; the platform name defaults to
    /// the channel's.
    pub fn new(channel: Arc<dyn Channel>, conversation_id: impl Into<String>) -> Self {
        Self {
            platform: channel.channel_type().platform_id().to_string(),
            conversation_id: conversation_id.into(),
            sender_name: None,
            result: None,
            channel,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    pub fn with_result(mut self, chain: MessageChain) -> Self {
        self.result = Some(chain);
        self
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Take whatever is left to deliver after the pipeline ran.
    pub fn take_result(&mut self) -> Option<MessageChain> {
        self.result.take()
    }
}

#[async_trait]
impl MessageEvent for OutboundEvent {
    fn platform_name(&self) -> &str {
        &self.platform
    }

    fn result(&self) -> Option<&MessageChain> {
        self.result.as_ref()
    }

    fn sender_name(&self) -> anyhow::Result<Option<String>> {
        Ok(self.sender_name.clone())
    }

    async fn send(&self, chain: MessageChain) -> Result<(), SendError> {
        self.channel.send(&self.conversation_id, chain).await
    }

    fn set_result(&mut self, chain: MessageChain) {
        self.result = Some(chain);
    }
}
