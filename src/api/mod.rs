//! Chat service abstraction
//!
//! This module defines the wire types of the coaching backend's chat
//! endpoints and the [`ChatApi`] trait the session layer talks to. The
//! reqwest-backed implementation lives in [`http`].

pub mod http;

pub use http::HttpChatApi;

use crate::error::Result;
use crate::session::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outbound chat turn
///
/// `conversation_id` is serialized as `null` until the server has issued one.
///
/// # Examples
///
/// ```
/// use fitcoach::api::ChatRequest;
///
/// let request = ChatRequest::new("hello", None, true);
/// let json = serde_json::to_value(&request).unwrap();
/// assert!(json["conversation_id"].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user text
    pub message: String,
    /// Conversation to continue, if any
    pub conversation_id: Option<String>,
    /// Ask the server to consider prior turns
    pub include_history: bool,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(
        message: impl Into<String>,
        conversation_id: Option<String>,
        include_history: bool,
    ) -> Self {
        Self {
            message: message.into(),
            conversation_id,
            include_history,
        }
    }
}

/// Reply to a chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Conversation identifier to use for the next turn
    pub conversation_id: String,
    /// Assistant reply (markdown-like text)
    pub message: String,
    /// Intent the server classified the user turn as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Extra fields the server extracted alongside the intent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// One entry of a server-side conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Server-side record of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub conversation_id: String,
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

/// Coaching backend chat endpoints
///
/// Implementations must treat every transport error, non-2xx status and
/// undecodable body as an `Err`; the session layer does not distinguish
/// between failure classes.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send one user turn and wait for the assistant reply
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be delivered or the reply is unusable
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Fetch the server-side history of a conversation
    ///
    /// # Errors
    ///
    /// Returns `FitcoachError::ConversationNotFound` when the server does not
    /// know the identifier, and other errors for transport failures
    async fn conversation_history(&self, conversation_id: &str) -> Result<ConversationHistory>;
}
