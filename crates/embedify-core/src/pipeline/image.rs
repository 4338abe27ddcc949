//! Pick the image a card should embed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::message::ImageRef;

/// Scheme for images uploaded alongside the message.
pub const ATTACHMENT_SCHEME: &str = "attachment://";

/// The image chosen for the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// Fetchable URL, embedded as is
    Remote(String),
    /// Local file, referenced by an `attachment://` token
    Attachment { token: String, path: PathBuf },
}

impl ResolvedImage {
    /// Value for the embed's image URL.
    pub fn embed_url(&self) -> &str {
        match self {
            Self::Remote(url) => url,
            Self::Attachment { token, .. } => token,
        }
    }
}

/// `attachment://<basename>` for a local file.
pub fn attachment_token(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    Some(format!("{ATTACHMENT_SCHEME}{name}"))
}

pub(crate) async fn file_exists(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(exists) => exists,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "Cannot check image file");
            false
        }
    }
}

/// Return the first usable image: a remote URL, or an existing local file
/// (`file://` URI or bare path) as an attachment token. Missing files are
/// skipped.
pub async fn resolve_image(images: &[ImageRef]) -> Option<ResolvedImage> {
    for image in images {
        if let Some(url) = image.remote_url() {
            return Some(ResolvedImage::Remote(url.to_string()));
        }

        let Some(path) = image.local_path() else {
            debug!(reference = %image.as_str(), "Image reference is not embeddable");
            continue;
        };

        if !file_exists(&path).await {
            warn!(path = %path.display(), "Image file does not exist");
            continue;
        }

        if let Some(token) = attachment_token(&path) {
            return Some(ResolvedImage::Attachment { token, path });
        }
    }
    None
}
