//! Channel Trait Definitions
//!
//! Defines the sending side of a chat platform.

use async_trait::async_trait;

use super::types::ChannelType;
use crate::error::SendError;
use crate::message::MessageChain;

/// Outbound communication channel
///
/// # Example
///
/// ```ignore
/// struct MyChannel { /* ... */ }
///
/// #[async_trait]
/// impl Channel for MyChannel {
///     fn channel_type(&self) -> ChannelType {
///         ChannelType::Discord
///     }
///
///     fn is_configured(&self) -> bool {
///         !self.token.is_empty()
///     }
///
///     async fn send(&self, conversation_id: &str, chain: MessageChain) -> Result<(), SendError> {
///         // Deliver via API
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get channel type
    fn channel_type(&self) -> ChannelType;

    /// Get channel display name
    fn name(&self) -> &str {
        self.channel_type().display_name()
    }

    /// Check if channel is properly configured
    fn is_configured(&self) -> bool;

    /// Deliver a message chain to a conversation
    async fn send(&self, conversation_id: &str, chain: MessageChain) -> Result<(), SendError>;

    /// Send a simple text message
    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<(), SendError> {
        self.send(conversation_id, MessageChain::plain(text)).await
    }
}

/// Test/mock channel for unit testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A mock channel that records deliveries and can be scripted to fail.
    pub struct MockChannel {
        channel_type: ChannelType,
        configured: AtomicBool,
        sent: Arc<tokio::sync::Mutex<Vec<(String, MessageChain)>>>,
        attempts: Arc<tokio::sync::Mutex<Vec<MessageChain>>>,
        failures: Arc<tokio::sync::Mutex<VecDeque<SendError>>>,
    }

    impl MockChannel {
        /// Create a new mock channel
        pub fn new(channel_type: ChannelType) -> Self {
            Self {
                channel_type,
                configured: AtomicBool::new(true),
                sent: Arc::new(tokio::sync::Mutex::new(Vec::new())),
                attempts: Arc::new(tokio::sync::Mutex::new(Vec::new())),
                failures: Arc::new(tokio::sync::Mutex::new(VecDeque::new())),
            }
        }

        /// Create an unconfigured mock channel
        pub fn unconfigured(channel_type: ChannelType) -> Self {
            let channel = Self::new(channel_type);
            channel.configured.store(false, Ordering::SeqCst);
            channel
        }

        /// Make the next send fail with `error`. Calls queue up in order.
        pub async fn fail_next(&self, error: SendError) {
            self.failures.lock().await.push_back(error);
        }

        /// Chains that were delivered successfully
        pub async fn sent_chains(&self) -> Vec<MessageChain> {
            self.sent
                .lock()
                .await
                .iter()
                .map(|(_, chain)| chain.clone())
                .collect()
        }

        /// Conversation ids of successful deliveries
        pub async fn sent_conversations(&self) -> Vec<String> {
            self.sent
                .lock()
                .await
                .iter()
                .map(|(id, _)| id.clone())
                .collect()
        }

        /// Every chain passed to `send`, failed or not
        pub async fn attempts(&self) -> Vec<MessageChain> {
            self.attempts.lock().await.clone()
        }
    }

    #[async_trait]
    impl Channel for MockChannel {
        fn channel_type(&self) -> ChannelType {
            self.channel_type
        }

        fn is_configured(&self) -> bool {
            self.configured.load(Ordering::SeqCst)
        }

        async fn send(&self, conversation_id: &str, chain: MessageChain) -> Result<(), SendError> {
            self.attempts.lock().await.push(chain.clone());
            if let Some(error) = self.failures.lock().await.pop_front() {
                return Err(error);
            }
            self.sent
                .lock()
                .await
                .push((conversation_id.to_string(), chain));
            Ok(())
        }
    }
}
