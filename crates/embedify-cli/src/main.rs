mod cli;
mod commands;
mod config;
mod dry_run;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,embedify_core=debug,embedify=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = config::CliConfig::load(cli.config.clone());

    match cli.command {
        Commands::Preview(args) => commands::run_preview(&config, args, cli.format).await,
        Commands::Send(args) => commands::run_send(&config, args, cli.format).await,
    }
}
