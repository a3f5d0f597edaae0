//! Test utilities for Fitcoach
//!
//! This module provides temporary file helpers and a scripted in-memory
//! [`ChatApi`] for unit tests.

use crate::api::{ChatApi, ChatRequest, ChatResponse, ConversationHistory, HistoryEntry};
use crate::error::{FitcoachError, Result};
use crate::session::Role;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Build a chat reply
pub fn reply(conversation_id: &str, message: &str, intent: Option<&str>) -> ChatResponse {
    ChatResponse {
        conversation_id: conversation_id.to_string(),
        message: message.to_string(),
        intent: intent.map(str::to_string),
        metadata: None,
    }
}

/// Chat API that plays back scripted outcomes in order
///
/// Every request is recorded. When the script runs out, further sends fail
/// the way an unreachable server would.
pub struct StubChatApi {
    outcomes: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubChatApi {
    pub fn new(outcomes: Vec<Result<ChatResponse>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for StubChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FitcoachError::Api("script exhausted".to_string()).into()))
    }

    async fn conversation_history(&self, conversation_id: &str) -> Result<ConversationHistory> {
        let entries = self
            .requests()
            .into_iter()
            .map(|r| HistoryEntry {
                role: Role::User,
                content: r.message,
            })
            .collect();
        Ok(ConversationHistory {
            conversation_id: conversation_id.to_string(),
            messages: entries,
        })
    }
}
