//! Title/body synthesis from text segments.

use crate::card::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, truncate_with_ellipsis};

/// Title and body derived from a message's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub title: Option<String>,
    pub body: String,
}

/// Join `texts` with newlines and promote the first line to a title when
/// more lines follow and it is shorter than [`MAX_TITLE_LEN`] characters.
pub fn synthesize(texts: &[String]) -> Synthesized {
    let full_text = texts.join("\n");

    let (title, body) = match full_text.split_once('\n') {
        Some((first, rest))
            if first.chars().count() < MAX_TITLE_LEN && !first.trim().is_empty() =>
        {
            (Some(first.trim().to_string()), rest.to_string())
        }
        _ => (None, full_text.clone()),
    };

    Synthesized {
        title,
        body: truncate_with_ellipsis(&body, MAX_DESCRIPTION_LEN),
    }
}
