//! Transcript message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the chat transcript
///
/// Messages are immutable once inserted into a
/// [`SessionStore`](crate::session::SessionStore); the store only hands out
/// shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message
    pub role: Role,
    /// Markdown-like text, rendered as-is by the caller
    pub content: String,
    /// Intent label the server attached to an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Free-form payload the server attached to an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// True for a locally synthesized failure notice
    #[serde(default)]
    pub is_error: bool,
    /// Local insertion time
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use fitcoach::session::{Message, Role};
    ///
    /// let message = Message::user("查看我的进度");
    /// assert_eq!(message.role, Role::User);
    /// assert!(!message.is_error);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None, false)
    }

    /// Creates an assistant reply, optionally tagged with an intent
    pub fn assistant(content: impl Into<String>, intent: Option<String>) -> Self {
        Self::new(Role::Assistant, content.into(), intent, false)
    }

    /// Attaches server metadata to the message
    pub fn with_metadata(mut self, metadata: Option<serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Creates an assistant-side failure notice
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), None, true)
    }

    fn new(role: Role, content: String, intent: Option<String>, is_error: bool) -> Self {
        Self {
            role,
            content,
            intent,
            metadata: None,
            is_error,
            created_at: Utc::now(),
        }
    }
}
