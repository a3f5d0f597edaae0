//! Transcript ownership and turn coordination
//!
//! [`SessionStore`] keeps the ordered, append-only transcript of one chat
//! screen together with the server-issued conversation identifier. A turn is
//! optimistic: the user message is appended before any network work starts,
//! and the outcome of the request is appended after it, never replacing what
//! is already there.
//!
//! # Turn lifecycle
//!
//! ```text
//! idle --begin_turn--> pending --complete_turn(Ok | Err)--> idle
//! ```
//!
//! `send_turn` and `submit` are async conveniences built on the two halves.
//! The store counts outstanding turns but never queues or rejects them;
//! callers gate new submissions on [`SessionStore::is_busy`].

use crate::api::{ChatApi, ChatRequest, ChatResponse};
use crate::config::ChatConfig;
use crate::error::Result;
use crate::session::Message;

/// Owner of one chat screen's transcript and conversation handle
#[derive(Debug, Clone)]
pub struct SessionStore {
    messages: Vec<Message>,
    /// Number of leading messages seeded locally (the greeting)
    seeded: usize,
    conversation_id: Option<String>,
    pending: usize,
    include_history: bool,
    failure_text: String,
}

impl SessionStore {
    /// Creates a store for a new chat screen
    ///
    /// The transcript starts with the configured greeting, if any, and the
    /// conversation identifier starts out empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitcoach::config::ChatConfig;
    /// use fitcoach::session::SessionStore;
    ///
    /// let store = SessionStore::new(&ChatConfig::default());
    /// assert_eq!(store.messages().len(), 1);
    /// assert!(store.conversation_id().is_none());
    /// assert!(!store.is_busy());
    /// ```
    pub fn new(config: &ChatConfig) -> Self {
        let mut messages = Vec::new();
        if !config.greeting.trim().is_empty() {
            messages.push(Message::assistant(config.greeting.clone(), None));
        }

        Self {
            seeded: messages.len(),
            messages,
            conversation_id: None,
            pending: 0,
            include_history: config.include_history,
            failure_text: config.failure_text.clone(),
        }
    }

    /// Creates a store that continues an existing server-side conversation
    pub fn resume(config: &ChatConfig, conversation_id: impl Into<String>) -> Self {
        let mut store = Self::new(config);
        store.conversation_id = Some(conversation_id.into());
        store
    }

    /// The transcript, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Identifier the next turn will carry, if the server has issued one
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// True while at least one turn is outstanding
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// True while the transcript holds nothing but the seeded greeting
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == self.seeded
    }

    /// Appends a user message at the tail of the transcript
    ///
    /// Blank text is ignored. Returns whether a message was appended.
    pub fn append_user_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring blank user message");
            return false;
        }
        self.messages.push(Message::user(text));
        true
    }

    /// Starts a turn and returns the request to deliver
    ///
    /// Marks the store busy until the matching [`complete_turn`] call.
    ///
    /// [`complete_turn`]: SessionStore::complete_turn
    pub fn begin_turn(&mut self, text: &str) -> ChatRequest {
        self.pending += 1;
        tracing::info!(
            "Turn started (conversation={:?}, outstanding={})",
            self.conversation_id,
            self.pending
        );
        ChatRequest::new(
            text.trim(),
            self.conversation_id.clone(),
            self.include_history,
        )
    }

    /// Applies the outcome of a turn started with [`begin_turn`]
    ///
    /// On success the assistant reply, with its intent and metadata, is
    /// appended and the conversation identifier replaced by the server's. On failure an error-flagged
    /// assistant message carrying the generic failure text is appended and
    /// the identifier is left alone. Returns the appended message.
    ///
    /// [`begin_turn`]: SessionStore::begin_turn
    pub fn complete_turn(&mut self, outcome: Result<ChatResponse>) -> &Message {
        if self.pending == 0 {
            tracing::warn!("Turn completed with no turn outstanding");
        }
        self.pending = self.pending.saturating_sub(1);

        let message = match outcome {
            Ok(reply) => {
                tracing::info!(
                    "Turn succeeded (conversation={}, intent={:?})",
                    reply.conversation_id,
                    reply.intent
                );
                self.conversation_id = Some(reply.conversation_id);
                Message::assistant(reply.message, reply.intent).with_metadata(reply.metadata)
            }
            Err(e) => {
                tracing::error!("Turn failed: {:#}", e);
                Message::error(self.failure_text.clone())
            }
        };

        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Sends one turn and appends its outcome
    ///
    /// Does not append the user message; see [`submit`](SessionStore::submit).
    pub async fn send_turn(&mut self, api: &dyn ChatApi, text: &str) -> &Message {
        let request = self.begin_turn(text);
        let outcome = api.send_message(&request).await;
        self.complete_turn(outcome)
    }

    /// Appends the user message, then sends it
    ///
    /// Returns the appended reply (or failure notice), or `None` when the
    /// text is blank and nothing happened.
    pub async fn submit(&mut self, api: &dyn ChatApi, text: &str) -> Option<&Message> {
        if !self.append_user_message(text) {
            return None;
        }
        Some(self.send_turn(api, text).await)
    }
}
