//! Channel that records chains instead of delivering them.

use async_trait::async_trait;
use embedify_core::channel::{Channel, ChannelType};
use embedify_core::{MessageChain, SendError};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct DryRunChannel {
    sent: Arc<Mutex<Vec<MessageChain>>>,
}

impl DryRunChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn take_sent(&self) -> Vec<MessageChain> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl Channel for DryRunChannel {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Console
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, _conversation_id: &str, chain: MessageChain) -> Result<(), SendError> {
        self.sent.lock().await.push(chain);
        Ok(())
    }
}
