//! Configuration management for Fitcoach
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! The resulting [`Config`] is the single injected settings object for a
//! chat screen; nothing else reads the environment for tokens or preferences.

use crate::error::{FitcoachError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Fitcoach
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat service connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Chat screen behavior
    #[serde(default)]
    pub chat: ChatConfig,
    /// Speech capture settings
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Chat service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the coaching backend (e.g. `http://localhost:8000`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request, when present
    #[serde(default)]
    pub access_token: Option<String>,

    /// Client-level HTTP timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Chat screen configuration
///
/// Controls the text the screen seeds and synthesizes, and whether the
/// server is asked to consider prior turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Ask the server to include conversation history when answering
    #[serde(default = "default_include_history")]
    pub include_history: bool,

    /// Assistant greeting placed at the head of every new transcript
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Content of the error bubble appended when a turn fails
    #[serde(default = "default_failure_text")]
    pub failure_text: String,

    /// Suggested prompts offered while only the greeting is shown
    #[serde(default = "default_quick_actions")]
    pub quick_actions: Vec<String>,
}

fn default_include_history() -> bool {
    true
}

fn default_greeting() -> String {
    "你好！我是你的AI健身助手。我可以帮你制定训练计划、提供营养建议、追踪进度。你想从哪里开始？"
        .to_string()
}

fn default_failure_text() -> String {
    "抱歉，发生了错误。请稍后再试。".to_string()
}

fn default_quick_actions() -> Vec<String> {
    vec![
        "我想制定一个训练计划".to_string(),
        "帮我分析今天的饮食".to_string(),
        "查看我的进度".to_string(),
        "我需要营养建议".to_string(),
    ]
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            include_history: default_include_history(),
            greeting: default_greeting(),
            failure_text: default_failure_text(),
            quick_actions: default_quick_actions(),
        }
    }
}

/// Speech capture configuration
///
/// These values are handed to the platform backend on every
/// `start_listening`. Only the language is free; `validate` pins the rest
/// to a single-utterance session with interim results and one hypothesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// BCP-47 working-language tag
    #[serde(default = "default_language")]
    pub language: String,

    /// Deliver interim (non-final) segments while the user speaks
    #[serde(default = "default_interim_results")]
    pub interim_results: bool,

    /// Keep recognizing after the first utterance
    #[serde(default)]
    pub continuous: bool,

    /// Number of alternative hypotheses per segment
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: u32,
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_interim_results() -> bool {
    true
}

fn default_max_alternatives() -> u32 {
    1
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            interim_results: default_interim_results(),
            continuous: false,
            max_alternatives: default_max_alternatives(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, for `--api-url` and `--token`
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FitcoachError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| FitcoachError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("FITCOACH_API_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(token) = std::env::var("FITCOACH_ACCESS_TOKEN") {
            self.api.access_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Ok(timeout) = std::env::var("FITCOACH_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid FITCOACH_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(language) = std::env::var("FITCOACH_LANGUAGE") {
            self.capture.language = language;
        }

        if let Ok(include) = std::env::var("FITCOACH_INCLUDE_HISTORY") {
            match include.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.chat.include_history = true,
                "0" | "false" | "no" | "off" => self.chat.include_history = false,
                _ => tracing::warn!("Invalid FITCOACH_INCLUDE_HISTORY: {}", include),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.api_url {
            tracing::debug!("Using API URL override from CLI: {}", url);
            self.api.base_url = url.clone();
        }
        if let Some(token) = &cli.token {
            self.api.access_token = Some(token.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            FitcoachError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FitcoachError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(FitcoachError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.failure_text.trim().is_empty() {
            return Err(
                FitcoachError::Config("chat.failure_text cannot be empty".to_string()).into(),
            );
        }

        if self.capture.language.trim().is_empty() {
            return Err(
                FitcoachError::Config("capture.language cannot be empty".to_string()).into(),
            );
        }

        // One session yields one end-of-session and one finalized transcript
        if self.capture.continuous {
            return Err(FitcoachError::Config(
                "capture.continuous is not supported; sessions are single-utterance".to_string(),
            )
            .into());
        }

        if !self.capture.interim_results {
            return Err(FitcoachError::Config(
                "capture.interim_results must be true".to_string(),
            )
            .into());
        }

        if self.capture.max_alternatives != 1 {
            return Err(FitcoachError::Config(format!(
                "capture.max_alternatives must be 1, got {}",
                self.capture.max_alternatives
            ))
            .into());
        }

        Ok(())
    }
}
