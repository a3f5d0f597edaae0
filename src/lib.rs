//! Fitcoach - AI fitness coach chat client library
//!
//! This library provides the core of the Fitcoach chat screen: the session
//! transcript with optimistic sends, the voice capture state machine, the
//! shared compose buffer, and the HTTP client for the coaching backend.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Transcript, conversation id and turn reconciliation
//! - `capture`: Speech capture controller and its pure transition function
//! - `composer`: The compose buffer shared by typing and speech
//! - `screen`: Per-screen context wiring the above together
//! - `api`: Chat service contract and HTTP implementation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fitcoach::api::HttpChatApi;
//! use fitcoach::capture::UnsupportedBackend;
//! use fitcoach::{ChatScreen, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let api = Arc::new(HttpChatApi::new(&config.api)?);
//!     let mut screen = ChatScreen::open(&config, api, Box::new(UnsupportedBackend));
//!     screen.type_text("我想制定一个训练计划");
//!     if let Some(reply) = screen.submit().await {
//!         println!("{}", reply.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod capture;
pub mod cli;
pub mod commands;
pub mod composer;
pub mod config;
pub mod error;
pub mod screen;
pub mod session;

// Re-export commonly used types
pub use capture::CaptureController;
pub use composer::Composer;
pub use config::Config;
pub use error::{FitcoachError, Result};
pub use screen::{ChatScreen, ScreenSnapshot};
pub use session::SessionStore;

#[cfg(test)]
pub mod test_utils;
