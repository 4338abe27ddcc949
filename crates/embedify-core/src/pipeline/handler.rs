//! Card assembly: the `on_before_send` hook.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::classify::{Classification, classify};
use super::image::{ResolvedImage, file_exists, resolve_image};
use super::reporter::{ErrorReporter, ReportOutcome};
use super::split::{SplitResult, split_components};
use super::synthesize::{Synthesized, synthesize};
use crate::card::{Embed, MAX_TITLE_LEN, truncate_with_ellipsis};
use crate::config::AdapterConfig;
use crate::error::SendError;
use crate::event::MessageEvent;
use crate::message::{ContentPart, ImageRef, MessageChain};

/// Why a message was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Event targets another platform
    WrongPlatform,
    /// Nothing pending to send
    EmptyResult,
    /// The message already carries an embed
    AlreadyEmbedded,
    /// No text, or a part a card cannot carry
    Ineligible,
}

/// What `on_before_send` did with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    Skipped(SkipReason),
    /// The embed was delivered and the original result cleared
    Sent { with_image: bool },
    /// The platform rejected the embed's image; it went out without one
    SentWithoutImage,
    /// Transformation failed and the error reporter took over
    Reported(ReportOutcome),
}

/// Converts eligible outgoing messages into themed embeds.
#[derive(Debug, Clone, Default)]
pub struct EmbedHandler {
    config: AdapterConfig,
    reporter: ErrorReporter,
}

impl EmbedHandler {
    pub fn new(config: AdapterConfig) -> Self {
        let reporter = ErrorReporter::new(config.locale);
        Self { config, reporter }
    }

    /// Inspect the event's pending result and, when eligible, deliver it as
    /// an embed instead. Events for other platforms and messages that
    /// already hold an embed are left alone.
    pub async fn on_before_send<E>(&self, event: &mut E) -> HandleOutcome
    where
        E: MessageEvent + ?Sized,
    {
        let split = match self.precheck(event) {
            Ok(split) => split,
            Err(reason) => return HandleOutcome::Skipped(reason),
        };

        info!("Intercepted outgoing message, converting to embed");

        match self.transform(event, split).await {
            Ok(outcome) => outcome,
            Err(error) => HandleOutcome::Reported(self.reporter.report(&*event, &error).await),
        }
    }

    fn precheck<E>(&self, event: &E) -> Result<SplitResult, SkipReason>
    where
        E: MessageEvent + ?Sized,
    {
        let platform = event.platform_name();
        if platform != self.config.platform {
            debug!(platform, "Not a {} message, skipping", self.config.platform);
            return Err(SkipReason::WrongPlatform);
        }

        let Some(chain) = event.result().filter(|chain| !chain.is_empty()) else {
            debug!("Message result is empty, skipping");
            return Err(SkipReason::EmptyResult);
        };

        if chain.contains_embed() {
            debug!("Message already contains an embed, skipping");
            return Err(SkipReason::AlreadyEmbedded);
        }

        let split = split_components(chain.parts());
        if !split.is_eligible() {
            debug!(
                texts = split.texts.len(),
                others = split.others.len(),
                "Message has no text or contains unsupported parts, skipping"
            );
            return Err(SkipReason::Ineligible);
        }
        Ok(split)
    }

    async fn transform<E>(&self, event: &mut E, split: SplitResult) -> Result<HandleOutcome, SendError>
    where
        E: MessageEvent + ?Sized,
    {
        let content = synthesize(&split.texts);
        let resolved = resolve_image(&split.images).await;
        let classification = classify(classification_input(&content));

        let mut embed = self.build_embed(&*event, &content, classification);
        let attachments = attach_image(&mut embed, resolved, split.images).await;

        let mut chain = MessageChain::new(vec![ContentPart::embed(embed.clone())]);
        for image in attachments {
            chain.push(ContentPart::Image(image));
        }

        match event.send(chain).await {
            Ok(()) => {
                event.set_result(MessageChain::empty());
                info!("Sent as embed and cleared the original result");
                Ok(HandleOutcome::Sent {
                    with_image: embed.image.is_some(),
                })
            }
            Err(e) if e.is_invalid_form_body() && embed.image.is_some() => {
                error!(error = %e, "Embed rejected, the image URL is probably malformed; retrying without it");
                embed.image = None;
                event
                    .send(MessageChain::new(vec![ContentPart::embed(embed)]))
                    .await?;
                event.set_result(MessageChain::empty());
                Ok(HandleOutcome::SentWithoutImage)
            }
            Err(e) => Err(e),
        }
    }

    fn build_embed<E>(&self, event: &E, content: &Synthesized, classification: Classification) -> Embed
    where
        E: MessageEvent + ?Sized,
    {
        let title = content
            .title
            .as_deref()
            .unwrap_or(self.config.locale.default_title());

        // Cut the title itself so the glyph survives the length cap.
        let budget = MAX_TITLE_LEN.saturating_sub(classification.glyph.chars().count());
        let title = truncate_with_ellipsis(title, budget);

        let mut embed = Embed::new()
            .with_title(format!("{}{}", classification.glyph, title))
            .with_description(content.body.as_str())
            .with_color(classification.color);

        if self.config.timestamp {
            embed = embed.with_timestamp(Utc::now());
        }

        if self.config.sender_footer {
            match event.sender_name() {
                Ok(Some(name)) if !name.trim().is_empty() => {
                    embed = embed.with_footer(format!("via {}", name.trim()));
                }
                Ok(_) => {}
                Err(e) => debug!(error = %e, "Sender name unavailable"),
            }
        }

        embed
    }
}

/// Text the classifier looks at: the body, then the title.
fn classification_input(content: &Synthesized) -> &str {
    if !content.body.is_empty() {
        &content.body
    } else {
        content.title.as_deref().unwrap_or("")
    }
}

/// Put the resolved image on the embed and return the images to send along
/// with it.
async fn attach_image(
    embed: &mut Embed,
    resolved: Option<ResolvedImage>,
    images: Vec<ImageRef>,
) -> Vec<ImageRef> {
    let mut images = deliverable_images(images).await;

    match resolved {
        Some(ResolvedImage::Remote(url)) => {
            images.retain(|image| image.remote_url() != Some(url.as_str()));
            embed.image = Some(url);
        }
        Some(ResolvedImage::Attachment { token, path }) => {
            let paired = images
                .iter()
                .any(|image| image.local_path().as_deref() == Some(path.as_path()));
            if paired {
                // Other local files uploaded under the same name would make the token ambiguous.
                let name = path.file_name();
                images.retain(|image| match image.local_path() {
                    Some(other) if other != path && other.file_name() == name => {
                        warn!(path = %other.display(), token = %token, "Dropping image that shares the attachment name");
                        false
                    }
                    _ => true,
                });
                embed.image = Some(token);
            } else {
                warn!(token = %token, "No attachment matches the resolved image, sending without it");
            }
        }
        None => {}
    }

    images
}

/// Drop local images whose file is gone; everything else passes through.
async fn deliverable_images(images: Vec<ImageRef>) -> Vec<ImageRef> {
    let mut kept = Vec::with_capacity(images.len());
    for image in images {
        if let Some(path) = image.local_path()
            && !file_exists(&path).await
        {
            warn!(path = %path.display(), "Dropping missing image attachment");
            continue;
        }
        kept.push(image);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Category;
    use crate::channel::ChannelType;
    use crate::channel::mock::MockChannel;
    use crate::config::Locale;
    use crate::event::OutboundEvent;
    use crate::message::OtherPart;
    use std::sync::Arc;

    fn discord_event(channel: &Arc<MockChannel>, parts: Vec<ContentPart>) -> OutboundEvent {
        OutboundEvent::new(channel.clone(), "conv-1").with_result(MessageChain::new(parts))
    }

    fn first_embed(chain: &MessageChain) -> Embed {
        chain.embeds().next().cloned().expect("chain has an embed")
    }

    #[tokio::test]
    async fn test_success_message_becomes_embed() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("Build succeeded"),
                ContentPart::text("All 12 tests passed"),
            ],
        )
        .with_sender_name("ci-bot");

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Sent { with_image: false });
        let sent = channel.sent_chains().await;
        let embed = first_embed(&sent[0]);
        assert_eq!(embed.title.as_deref(), Some("✅Build succeeded"));
        assert_eq!(embed.description.as_deref(), Some("All 12 tests passed"));
        assert_eq!(embed.color, Some(Category::Success.color()));
        assert_eq!(embed.footer.as_deref(), Some("via ci-bot"));
        assert!(embed.timestamp.is_some());
        assert_eq!(event.result(), Some(&MessageChain::empty()));
    }

    #[tokio::test]
    async fn test_default_title_and_no_glyph() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event = discord_event(&channel, vec![ContentPart::text("The weather is nice")]);
        let handler = EmbedHandler::new(AdapterConfig {
            locale: Locale::Zh,
            timestamp: false,
            ..AdapterConfig::default()
        });

        handler.on_before_send(&mut event).await;

        let embed = first_embed(&channel.sent_chains().await[0]);
        assert_eq!(embed.title.as_deref(), Some("消息"));
        assert_eq!(embed.description.as_deref(), Some("The weather is nice"));
        assert_eq!(embed.color, Some(Category::Default.color()));
        assert!(embed.timestamp.is_none());
        assert!(embed.footer.is_none());
    }

    #[tokio::test]
    async fn test_skips_other_platforms() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event =
            discord_event(&channel, vec![ContentPart::text("hello")]).with_platform("telegram");

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Skipped(SkipReason::WrongPlatform));
        assert!(channel.attempts().await.is_empty());
        assert_eq!(event.result(), Some(&MessageChain::plain("hello")));
    }

    #[tokio::test]
    async fn test_skips_empty_and_missing_results() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let handler = EmbedHandler::default();

        let mut missing = OutboundEvent::new(channel.clone(), "c");
        assert_eq!(
            handler.on_before_send(&mut missing).await,
            HandleOutcome::Skipped(SkipReason::EmptyResult)
        );

        let mut empty = discord_event(&channel, vec![]);
        assert_eq!(
            handler.on_before_send(&mut empty).await,
            HandleOutcome::Skipped(SkipReason::EmptyResult)
        );
    }

    #[tokio::test]
    async fn test_skips_existing_embed() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("hi"),
                ContentPart::embed(Embed::info("t", "d")),
            ],
        );

        assert_eq!(
            EmbedHandler::default().on_before_send(&mut event).await,
            HandleOutcome::Skipped(SkipReason::AlreadyEmbedded)
        );
        assert!(channel.attempts().await.is_empty());
    }

    #[tokio::test]
    async fn test_widgets_are_dropped_from_the_card() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("pick one"),
                ContentPart::Other(OtherPart::View { components: vec![] }),
            ],
        );

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Sent { with_image: false });
        assert_eq!(channel.sent_chains().await[0].len(), 1);
    }

    #[tokio::test]
    async fn test_remote_image_is_embedded_and_deduplicated() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("Screenshot"),
                ContentPart::image("https://example.com/a.png"),
                ContentPart::image("https://example.com/b.png"),
                ContentPart::image("https://example.com/a.png"),
            ],
        );

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Sent { with_image: true });
        let sent = &channel.sent_chains().await[0];
        assert_eq!(
            first_embed(sent).image.as_deref(),
            Some("https://example.com/a.png")
        );
        let rest: Vec<&str> = sent.images().map(ImageRef::as_str).collect();
        assert_eq!(rest, vec!["https://example.com/b.png"]);
    }

    #[tokio::test]
    async fn test_local_image_is_paired_with_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        std::fs::write(&path, b"png").unwrap();

        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("Report\nweekly numbers"),
                ContentPart::image(path.to_string_lossy()),
            ],
        );

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Sent { with_image: true });
        let sent = &channel.sent_chains().await[0];
        assert_eq!(first_embed(sent).image.as_deref(), Some("attachment://plot.png"));
        assert_eq!(sent.images().count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_body_retries_without_image() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        channel
            .fail_next(SendError::InvalidFormBody("embeds.0.image.url".into()))
            .await;
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("look"),
                ContentPart::image("https://bad host/x.png"),
            ],
        );

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::SentWithoutImage);
        let attempts = channel.attempts().await;
        assert_eq!(attempts.len(), 2);
        assert!(first_embed(&attempts[0]).image.is_some());
        let retried = &attempts[1];
        assert_eq!(retried.len(), 1);
        assert!(first_embed(retried).image.is_none());
        assert_eq!(first_embed(retried).title, first_embed(&attempts[0]).title);
        assert_eq!(event.result(), Some(&MessageChain::empty()));
    }

    #[tokio::test]
    async fn test_invalid_form_body_without_image_is_reported() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        channel
            .fail_next(SendError::InvalidFormBody("content".into()))
            .await;
        let mut event = discord_event(&channel, vec![ContentPart::text("plain")]);

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Reported(ReportOutcome::Card));
        let sent = channel.sent_chains().await;
        let report = first_embed(&sent[0]);
        assert_eq!(report.description.as_deref(), Some(Locale::En.invalid_form_body()));
        assert_eq!(event.result(), Some(&MessageChain::plain("plain")));
    }

    #[tokio::test]
    async fn test_failed_retry_is_reported() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        channel.fail_next(SendError::InvalidFormBody("image".into())).await;
        channel
            .fail_next(SendError::Api {
                status: 500,
                body: "oops".into(),
            })
            .await;
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("look"),
                ContentPart::image("https://example.com/x.png"),
            ],
        );

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Reported(ReportOutcome::Card));
        assert_eq!(channel.attempts().await.len(), 3);
    }

    #[tokio::test]
    async fn test_other_failures_skip_retry() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        channel
            .fail_next(SendError::Api {
                status: 403,
                body: "Missing Access".into(),
            })
            .await;
        let mut event = discord_event(
            &channel,
            vec![
                ContentPart::text("look"),
                ContentPart::image("https://example.com/x.png"),
            ],
        );

        let outcome = EmbedHandler::default().on_before_send(&mut event).await;

        assert_eq!(outcome, HandleOutcome::Reported(ReportOutcome::Card));
        let attempts = channel.attempts().await;
        assert_eq!(attempts.len(), 2);
        let report = first_embed(&attempts[1]);
        assert_eq!(report.footer.as_deref(), Some("via Error Handler"));
    }

    #[test]
    fn test_classification_input_falls_back_to_title() {
        let content = Synthesized {
            title: Some("Upload failed".into()),
            body: String::new(),
        };
        assert_eq!(classification_input(&content), "Upload failed");

        let content = Synthesized {
            title: None,
            body: String::new(),
        };
        assert_eq!(classification_input(&content), "");
    }

    #[tokio::test]
    async fn test_unpaired_attachment_sends_without_image() {
        let mut embed = Embed::new().with_title("Report");
        let resolved = ResolvedImage::Attachment {
            token: "attachment://gone.png".into(),
            path: "/nonexistent/gone.png".into(),
        };
        let images = vec![ImageRef::new("https://example.com/a.png")];

        let out = attach_image(&mut embed, Some(resolved), images).await;

        assert!(embed.image.is_none());
        assert_eq!(out, vec![ImageRef::new("https://example.com/a.png")]);
    }

    #[tokio::test]
    async fn test_attachment_pairs_by_full_path() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let chosen = first.path().join("x.png");
        let namesake = second.path().join("x.png");
        let other = second.path().join("y.png");
        for path in [&chosen, &namesake, &other] {
            std::fs::write(path, b"png").unwrap();
        }

        let images = vec![
            ImageRef::new(chosen.to_string_lossy()),
            ImageRef::new(namesake.to_string_lossy()),
            ImageRef::new(other.to_string_lossy()),
        ];
        let resolved = resolve_image(&images).await;
        let mut embed = Embed::new();

        let out = attach_image(&mut embed, resolved, images).await;

        assert_eq!(embed.image.as_deref(), Some("attachment://x.png"));
        assert_eq!(
            out,
            vec![
                ImageRef::new(chosen.to_string_lossy()),
                ImageRef::new(other.to_string_lossy()),
            ]
        );
    }

    #[tokio::test]
    async fn test_long_title_keeps_glyph_and_marks_cut() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let title = "a".repeat(255);
        let mut event = discord_event(
            &channel,
            vec![ContentPart::text(format!("{title}\nwarning: disk almost full"))],
        );

        EmbedHandler::default().on_before_send(&mut event).await;

        let embed = first_embed(&channel.sent_chains().await[0]);
        let sent_title = embed.title.unwrap();
        assert!(sent_title.starts_with(Category::Warning.glyph()));
        assert!(sent_title.ends_with("..."));
        assert_eq!(sent_title.chars().count(), MAX_TITLE_LEN);
    }
}
