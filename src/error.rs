//! Error types for Fitcoach
//!
//! This module defines the crate-level error type, using `thiserror` for
//! ergonomic error handling. Capture failures have their own taxonomy in
//! [`crate::capture::CaptureError`] because they are state, not control flow.

use thiserror::Error;

/// Main error type for Fitcoach operations
///
/// Every variant here ends a single attempt (a config load, an HTTP call,
/// a readline read). None of them leave the session or capture state
/// half-updated.
#[derive(Error, Debug)]
pub enum FitcoachError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chat service answered with something other than a usable reply
    #[error("Chat API error: {0}")]
    Api(String),

    /// The chat service rejected the access token
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Requested server-side conversation does not exist
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Interactive line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Fitcoach operations
///
/// Uses `anyhow::Error` so call sites can attach context while the typed
/// [`FitcoachError`] stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
