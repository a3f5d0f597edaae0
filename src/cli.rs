//! Command-line interface definition for Fitcoach
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot turns, and
//! server-side history lookup.

use clap::{Parser, Subcommand};

/// Fitcoach - chat with the AI fitness coach from your terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "fitcoach")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the coaching backend base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Bearer token for the coaching backend
    #[arg(long)]
    pub token: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Fitcoach
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat session with the coach
    Chat,

    /// Send a single message and print the reply
    Send {
        /// Message text
        message: String,

        /// Continue an existing server-side conversation
        #[arg(long)]
        conversation_id: Option<String>,
    },

    /// Print the server-side history of a conversation
    History {
        /// Conversation identifier returned by an earlier reply
        conversation_id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            api_url: None,
            token: None,
            command: Commands::Chat,
        }
    }
}
