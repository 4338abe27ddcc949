//! Partition a chain into text, images and everything else.

use crate::message::{ContentPart, ImageRef, OtherPart};

/// Parts of a message, sorted by what the pipeline can do with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResult {
    /// Trimmed, non-empty text segments
    pub texts: Vec<String>,
    pub images: Vec<ImageRef>,
    /// Parts that block the transformation
    pub others: Vec<OtherPart>,
}

impl SplitResult {
    /// A message can become a card when it has text and nothing that a card
    /// cannot carry.
    pub fn is_eligible(&self) -> bool {
        !self.texts.is_empty() && self.others.is_empty()
    }
}

/// Split `parts`. Whitespace-only text is dropped and widget placeholders
/// are ignored.
pub fn split_components(parts: &[ContentPart]) -> SplitResult {
    let mut result = SplitResult::default();
    for part in parts {
        match part {
            ContentPart::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    result.texts.push(trimmed.to_string());
                }
            }
            ContentPart::Image(image) => result.images.push(image.clone()),
            ContentPart::Other(other) if other.is_widget() => {}
            ContentPart::Other(other) => result.others.push(other.clone()),
        }
    }
    result
}
