//! Embedify core: turns outgoing chat messages into Discord embeds.
//!
//! The [`pipeline::EmbedHandler`] is the single entry point a host calls
//! right before a message is delivered. It inspects the pending
//! [`message::MessageChain`], and when the message is eligible it sends a
//! themed [`card::Embed`] in its place and clears the original payload.

pub mod card;
pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod pipeline;

pub use card::{Category, Embed, EmbedField, Theme};
pub use config::{AdapterConfig, Locale};
pub use error::{ConfigError, SendError};
pub use event::{MessageEvent, OutboundEvent};
pub use message::{ContentPart, ImageRef, MessageChain, OtherPart};
pub use pipeline::{EmbedHandler, ErrorReporter, HandleOutcome, SkipReason};
