use anyhow::{Context, Result, bail};
use embedify_core::channel::{Channel, DiscordChannel};
use embedify_core::pipeline::ReportOutcome;
use embedify_core::{EmbedHandler, HandleOutcome, MessageChain, OutboundEvent, SkipReason};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::cli::{OutputFormat, PreviewArgs, SendArgs};
use crate::config::CliConfig;
use crate::dry_run::DryRunChannel;

/// A message as the host would hand it to the pipeline.
#[derive(Debug, Deserialize)]
pub struct MessageDocument {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub sender: Option<String>,
    pub parts: MessageChain,
}

fn default_platform() -> String {
    "discord".to_string()
}

pub fn load_document(path: &Path) -> Result<MessageDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read message file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid message document '{}'", path.display()))
}

fn build_event(
    channel: Arc<dyn Channel>,
    conversation_id: &str,
    doc: MessageDocument,
) -> OutboundEvent {
    let mut event = OutboundEvent::new(channel, conversation_id)
        .with_platform(doc.platform)
        .with_result(doc.parts);
    if let Some(sender) = doc.sender {
        event = event.with_sender_name(sender);
    }
    event
}

pub async fn run_preview(config: &CliConfig, args: PreviewArgs, format: OutputFormat) -> Result<()> {
    let doc = load_document(&args.message)?;
    let channel = Arc::new(DryRunChannel::new());
    let mut event = build_event(channel.clone(), "preview", doc);

    let outcome = EmbedHandler::new(config.adapter.clone())
        .on_before_send(&mut event)
        .await;

    let sent = channel.take_sent().await;
    let remaining = event.take_result().filter(|chain| !chain.is_empty());
    print_report(format, outcome, &sent, remaining.as_ref())
}

pub async fn run_send(config: &CliConfig, args: SendArgs, format: OutputFormat) -> Result<()> {
    let Some(token) = args
        .token
        .or_else(|| config.discord.bot_token.clone())
        .filter(|token| !token.trim().is_empty())
    else {
        bail!("Discord bot token not configured. Pass --token or set DISCORD_BOT_TOKEN");
    };
    let Some(channel_id) = args.channel_id.or_else(|| config.discord.channel_id.clone()) else {
        bail!("No Discord channel id. Pass --channel-id or set [discord].channel_id");
    };

    let doc = load_document(&args.message)?;
    let channel = Arc::new(DiscordChannel::with_token(token.trim()));
    let mut event = build_event(channel.clone(), &channel_id, doc);

    let outcome = EmbedHandler::new(config.adapter.clone())
        .on_before_send(&mut event)
        .await;

    // Untransformed messages are delivered as the host would.
    let remaining = event.take_result().filter(|chain| !chain.is_empty());
    if let Some(chain) = &remaining {
        info!(channel_id = %channel_id, "Delivering original message");
        channel.send(&channel_id, chain.clone()).await?;
    }

    print_report(format, outcome, &[], remaining.as_ref())
}

pub fn describe_outcome(outcome: HandleOutcome) -> String {
    match outcome {
        HandleOutcome::Sent { with_image: true } => "sent as embed with image".to_string(),
        HandleOutcome::Sent { with_image: false } => "sent as embed".to_string(),
        HandleOutcome::SentWithoutImage => "sent as embed after dropping the image".to_string(),
        HandleOutcome::Skipped(reason) => {
            let reason = match reason {
                SkipReason::WrongPlatform => "other platform",
                SkipReason::EmptyResult => "nothing to send",
                SkipReason::AlreadyEmbedded => "already an embed",
                SkipReason::Ineligible => "unsupported content",
            };
            format!("skipped ({})", reason)
        }
        HandleOutcome::Reported(report) => {
            let how = match report {
                ReportOutcome::Card => "error card",
                ReportOutcome::PlainText => "plain text",
                ReportOutcome::Failed => "not delivered",
            };
            format!("failed, reported as {}", how)
        }
    }
}

fn print_report(
    format: OutputFormat,
    outcome: HandleOutcome,
    sent: &[MessageChain],
    remaining: Option<&MessageChain>,
) -> Result<()> {
    let payloads: Vec<Value> = sent
        .iter()
        .map(|chain| DiscordChannel::build_payload(chain).json)
        .collect();

    if format.is_json() {
        let report = json!({
            "outcome": describe_outcome(outcome),
            "messages": payloads,
            "remaining": remaining,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("outcome: {}", describe_outcome(outcome));
    for (index, payload) in payloads.iter().enumerate() {
        println!("[{}] {}", index + 1, serde_json::to_string_pretty(payload)?);
    }
    if let Some(chain) = remaining {
        println!("original: {}", chain.text_content());
    }
    Ok(())
}
