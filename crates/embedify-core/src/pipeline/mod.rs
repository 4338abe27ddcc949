//! Message-to-embed pipeline.
//!
//! ```text
//! on_before_send ─► precheck ─► split_components ─► synthesize ─┐
//!                                                  resolve_image ├─► build embed ─► send
//!                                                       classify ┘        │
//!                                                                         ▼
//!                                                           ErrorReporter (on failure)
//! ```
//!
//! Classification, splitting and synthesis are pure. Image resolution only
//! touches the filesystem to check that local files exist. Sends are the
//! only operations that can fail.

mod classify;
mod handler;
mod image;
mod reporter;
mod split;
mod synthesize;

pub use classify::{Classification, classify};
pub use handler::{EmbedHandler, HandleOutcome, SkipReason};
pub use image::{ATTACHMENT_SCHEME, ResolvedImage, attachment_token, resolve_image};
pub use reporter::{ERROR_HANDLER_FOOTER, ErrorReporter, ReportOutcome};
pub use split::{SplitResult, split_components};
pub use synthesize::{Synthesized, synthesize};
