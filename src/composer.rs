//! Compose buffer
//!
//! The [`Composer`] holds the one text buffer that both keystrokes and
//! finalized speech write into. Submitting hands the trimmed buffer to the
//! [`SessionStore`] and clears it.

use crate::api::ChatApi;
use crate::session::{Message, SessionStore};

/// Single source of truth for the text about to be submitted
#[derive(Debug, Clone, Default)]
pub struct Composer {
    buffer: String,
    focus_requested: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Manual edit: replace the buffer with what the user typed
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Route a finalized transcript into the buffer
    ///
    /// The transcript replaces any typed text wholesale and a focus request
    /// is raised so the user can edit before sending.
    pub fn apply_transcript(&mut self, transcript: impl Into<String>) {
        self.buffer = transcript.into();
        self.focus_requested = true;
    }

    /// Consume the pending focus request, if any
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Whether a submit would go through right now
    pub fn can_submit(&self, store: &SessionStore) -> bool {
        !self.buffer.trim().is_empty() && !store.is_busy()
    }

    /// Take the trimmed buffer for sending, clearing it
    ///
    /// Returns `None`, leaving the buffer untouched, when the buffer is blank
    /// or the store has a turn outstanding.
    pub fn take_submission(&mut self, store: &SessionStore) -> Option<String> {
        if store.is_busy() {
            tracing::debug!("Submit rejected: a turn is outstanding");
            return None;
        }
        let text = self.buffer.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();
        self.buffer.clear();
        Some(text)
    }

    /// Submit the buffer as a user turn
    ///
    /// Returns the reply (or failure notice) appended by the store, or
    /// `None` if the submit was rejected.
    pub async fn submit<'s>(
        &mut self,
        store: &'s mut SessionStore,
        api: &dyn ChatApi,
    ) -> Option<&'s Message> {
        let text = self.take_submission(store)?;
        store.submit(api, &text).await
    }
}
