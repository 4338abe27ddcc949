use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Parser)]
#[command(name = "embedify")]
#[command(version, about = "Embedify - turn outgoing chat messages into Discord embeds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.config/embedify/config.toml)
    #[arg(long, global = true, env = "EMBEDIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline without sending and print the Discord payloads
    Preview(PreviewArgs),

    /// Run the pipeline against a Discord channel
    Send(SendArgs),
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Message document (JSON)
    pub message: PathBuf,
}

#[derive(Args)]
pub struct SendArgs {
    /// Message document (JSON)
    pub message: PathBuf,

    /// Target Discord channel id (defaults to [discord].channel_id)
    #[arg(long)]
    pub channel_id: Option<String>,

    /// Bot token (defaults to [discord].bot_token)
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
