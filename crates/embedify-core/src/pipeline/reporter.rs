//! Last-resort error reporting to the sender.

use std::fmt::Display;

use tracing::error;

use crate::card::Embed;
use crate::config::Locale;
use crate::error::INVALID_FORM_BODY;
use crate::event::MessageEvent;
use crate::message::{ContentPart, MessageChain};

/// Footer on every error card.
pub const ERROR_HANDLER_FOOTER: &str = "via Error Handler";

const REGION_UNSUPPORTED: &str = "User location is not supported";

/// How the error reached the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Card,
    PlainText,
    /// Nothing could be delivered; the failure was only logged
    Failed,
}

/// Formats failures and delivers them as an error card, falling back to a
/// plain text line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter {
    locale: Locale,
}

impl ErrorReporter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Human-readable text for `error`. Known upstream failures get a
    /// friendlier explanation; everything else is passed through.
    pub fn format_error(&self, error: &str) -> String {
        if error.contains(REGION_UNSUPPORTED) {
            self.locale.region_unsupported().to_string()
        } else if error.contains(INVALID_FORM_BODY) {
            self.locale.invalid_form_body().to_string()
        } else {
            error.to_string()
        }
    }

    /// The error card sent for `message`.
    pub fn error_embed(&self, message: &str) -> Embed {
        Embed::error(format!("❌ {}", self.locale.error_word()), message)
            .with_footer(ERROR_HANDLER_FOOTER)
    }

    /// Plain text sent when the error card cannot be delivered.
    pub fn plain_text(&self, message: &str) -> String {
        format!("❌ {}: {}", self.locale.error_word(), message)
    }

    /// Tell the sender about `failure`. Never fails; when even the plain
    /// text line cannot be sent the failure is logged.
    pub async fn report<E>(&self, event: &E, failure: &(dyn Display + Send + Sync)) -> ReportOutcome
    where
        E: MessageEvent + ?Sized,
    {
        let message = self.format_error(&failure.to_string());
        error!(error = %message, "Message transformation failed");

        let card = MessageChain::new(vec![ContentPart::embed(self.error_embed(&message))]);
        let card_error = match event.send(card).await {
            Ok(()) => return ReportOutcome::Card,
            Err(e) => e,
        };
        error!(error = %card_error, "Failed to send error card");

        match event.send(MessageChain::plain(self.plain_text(&message))).await {
            Ok(()) => ReportOutcome::PlainText,
            Err(e) => {
                error!(error = %e, "Failed to send plain-text error report");
                ReportOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Category;
    use crate::channel::ChannelType;
    use crate::channel::mock::MockChannel;
    use crate::error::SendError;
    use crate::event::OutboundEvent;
    use std::sync::Arc;

    fn event(channel: &Arc<MockChannel>) -> OutboundEvent {
        OutboundEvent::new(channel.clone(), "conv-1")
    }

    #[test]
    fn test_format_known_failures() {
        let reporter = ErrorReporter::new(Locale::En);
        assert_eq!(
            reporter.format_error("400: User location is not supported for the API use."),
            Locale::En.region_unsupported()
        );
        assert_eq!(
            reporter.format_error("Invalid Form Body: embeds.0.image.url"),
            Locale::En.invalid_form_body()
        );
        assert_eq!(reporter.format_error("connection reset"), "connection reset");
    }

    #[test]
    fn test_format_localized() {
        let reporter = ErrorReporter::new(Locale::Zh);
        assert_eq!(
            reporter.format_error("Invalid Form Body"),
            "消息格式无效。请检查消息内容是否符合Discord的要求。"
        );
        assert_eq!(reporter.plain_text("x"), "❌ 错误: x");
    }

    #[test]
    fn test_error_embed_shape() {
        let embed = ErrorReporter::default().error_embed("boom");
        assert_eq!(embed.title.as_deref(), Some("❌ Error"));
        assert_eq!(embed.description.as_deref(), Some("boom"));
        assert_eq!(embed.color, Some(Category::Error.color()));
        assert_eq!(embed.footer.as_deref(), Some(ERROR_HANDLER_FOOTER));
    }

    #[tokio::test]
    async fn test_report_sends_card() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        let outcome = ErrorReporter::default()
            .report(&event(&channel), &SendError::Other("boom".into()))
            .await;

        assert_eq!(outcome, ReportOutcome::Card);
        let sent = channel.sent_chains().await;
        assert_eq!(sent.len(), 1);
        let embed = sent[0].embeds().next().unwrap();
        assert_eq!(embed.footer.as_deref(), Some("via Error Handler"));
    }

    #[tokio::test]
    async fn test_report_falls_back_to_plain_text() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        channel.fail_next(SendError::Other("card rejected".into())).await;

        let outcome = ErrorReporter::default()
            .report(&event(&channel), &SendError::Other("boom".into()))
            .await;

        assert_eq!(outcome, ReportOutcome::PlainText);
        let sent = channel.sent_chains().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text_content().starts_with("❌"));
        assert!(sent[0].text_content().contains("boom"));
    }

    #[tokio::test]
    async fn test_report_failure_is_swallowed() {
        let channel = Arc::new(MockChannel::new(ChannelType::Discord));
        channel.fail_next(SendError::Other("down".into())).await;
        channel.fail_next(SendError::Other("still down".into())).await;

        let outcome = ErrorReporter::default()
            .report(&event(&channel), &SendError::Other("boom".into()))
            .await;

        assert_eq!(outcome, ReportOutcome::Failed);
        assert_eq!(channel.attempts().await.len(), 2);
        assert!(channel.sent_chains().await.is_empty());
    }
}
