//! Outbound channel layer.
//!
//! The pipeline never talks to a platform directly. It hands finished
//! [`MessageChain`](crate::message::MessageChain)s to a [`Channel`], which
//! owns the wire format.
//!
//! ```text
//!   EmbedHandler ──► MessageEvent::send ──► trait Channel
//!                                              │
//!                                    ┌─────────┴─────────┐
//!                                    ▼                   ▼
//!                              DiscordChannel      (host channels)
//! ```

mod discord;
mod traits;
mod types;

pub use discord::{DiscordChannel, DiscordConfig, DiscordPayload, PendingUpload};
pub use traits::Channel;
pub use types::ChannelType;

#[cfg(any(test, feature = "test-utils"))]
pub use traits::mock;
