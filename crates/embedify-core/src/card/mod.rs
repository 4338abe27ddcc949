//! Card payloads and themes.

mod embed;
mod theme;

pub use embed::{
    Embed, EmbedField, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, truncate_with_ellipsis,
};
pub use theme::{Category, Theme};
