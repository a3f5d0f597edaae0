//! Chat screen context
//!
//! A [`ChatScreen`] is the per-screen bundle of session store, composer and
//! capture controller plus the chat API handle. It is created with
//! [`ChatScreen::open`] from an injected [`Config`] and torn down with
//! [`ChatScreen::close`] (or by dropping it); nothing is shared between
//! screens.
//!
//! The presentation layer reads [`ScreenSnapshot`]s and calls the action
//! methods; it never touches the components directly.

use std::sync::Arc;

use crate::api::{ChatApi, ChatRequest, ChatResponse, ConversationHistory};
use crate::capture::{CaptureController, CaptureError, CaptureEvent, CapturePhase, SpeechBackend};
use crate::composer::Composer;
use crate::config::Config;
use crate::error::Result;
use crate::session::{Message, SessionStore};

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub messages: Vec<Message>,
    pub conversation_id: Option<String>,
    pub busy: bool,
    pub compose_text: String,
    pub capture_supported: bool,
    pub capture_phase: CapturePhase,
    pub capture_transcript: String,
    pub capture_error: Option<CaptureError>,
}

/// One open chat screen
pub struct ChatScreen {
    store: SessionStore,
    composer: Composer,
    capture: CaptureController,
    api: Arc<dyn ChatApi>,
    quick_actions: Vec<String>,
}

impl ChatScreen {
    /// Open a screen with a fresh transcript
    pub fn open(config: &Config, api: Arc<dyn ChatApi>, backend: Box<dyn SpeechBackend>) -> Self {
        Self::with_store(config, SessionStore::new(&config.chat), api, backend)
    }

    /// Open a screen that continues a server-side conversation
    pub fn resume(
        config: &Config,
        conversation_id: impl Into<String>,
        api: Arc<dyn ChatApi>,
        backend: Box<dyn SpeechBackend>,
    ) -> Self {
        let store = SessionStore::resume(&config.chat, conversation_id);
        Self::with_store(config, store, api, backend)
    }

    fn with_store(
        config: &Config,
        store: SessionStore,
        api: Arc<dyn ChatApi>,
        backend: Box<dyn SpeechBackend>,
    ) -> Self {
        tracing::debug!("Opening chat screen");
        Self {
            store,
            composer: Composer::new(),
            capture: CaptureController::new(backend, config.capture.clone()),
            api,
            quick_actions: config.chat.quick_actions.clone(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    /// Current render state
    pub fn snapshot(&self) -> ScreenSnapshot {
        let capture = self.capture.state();
        ScreenSnapshot {
            messages: self.store.messages().to_vec(),
            conversation_id: self.store.conversation_id().map(str::to_string),
            busy: self.store.is_busy(),
            compose_text: self.composer.text().to_string(),
            capture_supported: self.capture.is_supported(),
            capture_phase: capture.phase,
            capture_transcript: capture.transcript.clone(),
            capture_error: capture.last_error.clone(),
        }
    }

    /// Manual typing into the compose buffer
    pub fn type_text(&mut self, text: impl Into<String>) {
        self.composer.set_text(text);
    }

    /// Consume the composer's pending focus request
    pub fn take_focus_request(&mut self) -> bool {
        self.composer.take_focus_request()
    }

    /// Suggested prompts; empty once the conversation has started
    pub fn quick_actions(&self) -> &[String] {
        if self.store.is_fresh() {
            self.quick_actions.as_slice()
        } else {
            &[]
        }
    }

    /// Put a quick action into the compose buffer without sending it
    ///
    /// Returns false when `index` is not an offered action.
    pub fn choose_quick_action(&mut self, index: usize) -> bool {
        match self.quick_actions().get(index).cloned() {
            Some(action) => {
                self.composer.set_text(action);
                true
            }
            None => false,
        }
    }

    /// Microphone button: start when idle, stop when listening
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::Unsupported` when voice input is unavailable
    pub fn toggle_voice(&mut self) -> std::result::Result<CapturePhase, CaptureError> {
        self.capture.availability()?;
        if self.capture.is_listening() {
            self.capture.stop_listening();
        } else {
            self.capture.start_listening();
        }
        Ok(self.capture.phase())
    }

    /// Route a platform capture event
    ///
    /// A finalized transcript replaces the compose buffer and is also
    /// returned to the caller.
    pub fn handle_capture_event(&mut self, event: CaptureEvent) -> Option<String> {
        let finalized = self.capture.handle_event(event)?;
        self.composer.apply_transcript(finalized.clone());
        Some(finalized)
    }

    /// Start a turn from the compose buffer
    ///
    /// Clears the buffer, appends the user message and marks the screen busy.
    /// The caller delivers the returned request and hands the outcome to
    /// [`complete_submit`](ChatScreen::complete_submit); the screen stays
    /// usable in between. Returns `None` when the buffer is blank or a turn
    /// is already outstanding.
    pub fn begin_submit(&mut self) -> Option<ChatRequest> {
        let text = self.composer.take_submission(&self.store)?;
        if !self.store.append_user_message(&text) {
            return None;
        }
        Some(self.store.begin_turn(&text))
    }

    /// Finish the turn started by [`begin_submit`](ChatScreen::begin_submit)
    pub fn complete_submit(&mut self, outcome: Result<ChatResponse>) -> &Message {
        self.store.complete_turn(outcome)
    }

    /// Chat API handle the screen sends through
    pub fn api(&self) -> Arc<dyn ChatApi> {
        Arc::clone(&self.api)
    }

    /// Submit the compose buffer and wait for the reply
    ///
    /// Returns the appended reply or failure notice, or `None` when the
    /// buffer was blank or a turn was already outstanding.
    pub async fn submit(&mut self) -> Option<&Message> {
        let api = self.api();
        let request = self.begin_submit()?;
        let outcome = api.send_message(&request).await;
        Some(self.complete_submit(outcome))
    }

    /// Server-side history of the current conversation
    ///
    /// Returns `Ok(None)` before the server has issued a conversation id.
    ///
    /// # Errors
    ///
    /// Returns error if the history request fails
    pub async fn history(&self) -> Result<Option<ConversationHistory>> {
        match self.store.conversation_id() {
            Some(id) => Ok(Some(self.api.conversation_history(id).await?)),
            None => Ok(None),
        }
    }

    /// Tear the screen down, releasing any open capture session
    pub fn close(&mut self) {
        tracing::debug!("Closing chat screen");
        self.capture.shutdown();
    }
}
