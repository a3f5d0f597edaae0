//! Fitcoach - AI fitness coach chat CLI
//!
#![doc = "Fitcoach - AI fitness coach chat CLI"]
#![doc = "Main entry point for the Fitcoach application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fitcoach::cli::{Cli, Commands};
use fitcoach::commands;
use fitcoach::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Send {
            message,
            conversation_id,
        } => {
            tracing::info!("Sending one-shot message");
            if let Some(id) = &conversation_id {
                tracing::debug!("Continuing conversation: {}", id);
            }
            commands::send::run_send(config, message, conversation_id).await?;
            Ok(())
        }
        Commands::History { conversation_id } => {
            tracing::info!("Fetching history for conversation: {}", conversation_id);
            commands::history::run_history(config, conversation_id).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
/// Logs go to stderr so they never interleave with the transcript.
fn init_tracing(verbose: bool, json_logs: bool) {
    let default_level = if verbose { "fitcoach=debug" } else { "fitcoach=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
