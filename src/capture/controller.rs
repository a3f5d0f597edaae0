//! Capture controller
//!
//! [`CaptureController`] drives a [`SpeechBackend`] through the pure
//! [`transition`] function. It owns the backend session: dropping the
//! controller while listening stops the session.

use crate::capture::backend::SpeechBackend;
use crate::capture::event::CaptureEvent;
use crate::capture::state::{CaptureError, CapturePhase, CaptureState};
use crate::capture::transition::{transition, Effect};
use crate::config::CaptureConfig;

/// Explicit, restartable speech capture state machine
///
/// # Examples
///
/// ```
/// use fitcoach::capture::fake::FakeBackend;
/// use fitcoach::capture::{CaptureController, CaptureEvent, Segment};
/// use fitcoach::config::CaptureConfig;
///
/// let (backend, _handle) = FakeBackend::new();
/// let mut controller = CaptureController::new(Box::new(backend), CaptureConfig::default());
///
/// controller.start_listening();
/// controller.handle_event(CaptureEvent::Result {
///     segments: vec![Segment::final_("查看我的进度")],
/// });
/// let finalized = controller.handle_event(CaptureEvent::Ended);
/// assert_eq!(finalized.as_deref(), Some("查看我的进度"));
/// ```
pub struct CaptureController {
    backend: Box<dyn SpeechBackend>,
    settings: CaptureConfig,
    supported: bool,
    state: CaptureState,
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("settings", &self.settings)
            .field("supported", &self.supported)
            .field("state", &self.state)
            .finish()
    }
}

impl CaptureController {
    /// Create a controller, probing the backend for support once
    pub fn new(backend: Box<dyn SpeechBackend>, settings: CaptureConfig) -> Self {
        let supported = backend.is_supported();
        if !supported {
            tracing::info!("Speech capture unavailable; voice input disabled");
        }
        Self {
            backend,
            settings,
            supported,
            state: CaptureState::default(),
        }
    }

    /// Whether speech capture can be used at all
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// `Err(CaptureError::Unsupported)` when voice input is unavailable
    pub fn availability(&self) -> std::result::Result<(), CaptureError> {
        if self.supported {
            Ok(())
        } else {
            Err(CaptureError::Unsupported)
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn phase(&self) -> CapturePhase {
        self.state.phase
    }

    pub fn is_listening(&self) -> bool {
        self.state.is_listening()
    }

    pub fn transcript(&self) -> &str {
        &self.state.transcript
    }

    pub fn last_error(&self) -> Option<&CaptureError> {
        self.state.last_error.as_ref()
    }

    /// Open a capture session
    ///
    /// No-op when unsupported or already listening. Returns whether a
    /// session was opened.
    pub fn start_listening(&mut self) -> bool {
        if !self.supported || self.is_listening() {
            return false;
        }
        self.apply(CaptureEvent::StartRequested);
        self.is_listening()
    }

    /// Ask the open session to end early
    ///
    /// No-op unless listening. The platform still delivers end-of-session,
    /// possibly with the text recognized so far.
    pub fn stop_listening(&mut self) -> bool {
        if !self.supported || !self.is_listening() {
            return false;
        }
        self.apply(CaptureEvent::StopRequested);
        true
    }

    /// Clear the transcript and last error without changing phase
    pub fn reset(&mut self) {
        self.apply(CaptureEvent::ResetRequested);
    }

    /// Feed one platform event into the machine
    ///
    /// Returns the finalized transcript when this event completed a session
    /// with text. The transcript is already cleared when this returns, so
    /// each completed session is reported exactly once.
    pub fn handle_event(&mut self, event: CaptureEvent) -> Option<String> {
        if !self.supported {
            tracing::debug!("Ignoring capture event while unsupported: {:?}", event);
            return None;
        }
        self.apply(event)
    }

    fn apply(&mut self, event: CaptureEvent) -> Option<String> {
        let before = self.state.phase;
        let next = transition(&self.state, &event);
        self.state = next.state;

        if before != self.state.phase {
            tracing::debug!(
                "Capture {} -> {} on {:?}",
                before,
                self.state.phase,
                event
            );
        }
        if let Some(error) = &self.state.last_error {
            if matches!(event, CaptureEvent::Error { .. }) {
                tracing::warn!("Speech capture failed: {} ({})", error, error.code());
            }
        }

        let mut finalized = None;
        for effect in next.effects {
            match effect {
                Effect::OpenSession => {
                    if let Err(e) = self.backend.start(&self.settings) {
                        tracing::error!("Failed to start speech capture: {:#}", e);
                        self.state = transition(&self.state, &CaptureEvent::StartFailed).state;
                    }
                }
                Effect::CloseSession => {
                    if let Err(e) = self.backend.stop() {
                        tracing::warn!("Failed to stop speech capture: {:#}", e);
                    }
                }
                Effect::EmitTranscript(text) => {
                    tracing::info!("Speech capture finalized {} chars", text.chars().count());
                    finalized = Some(text);
                }
            }
        }
        finalized
    }

    /// Stop any open session and return to idle
    ///
    /// Called on teardown of the owning screen; no further platform events
    /// are expected afterwards.
    pub fn shutdown(&mut self) {
        if self.is_listening() {
            tracing::debug!("Stopping open capture session on teardown");
            if let Err(e) = self.backend.stop() {
                tracing::warn!("Failed to stop speech capture on teardown: {:#}", e);
            }
            self.state = CaptureState::default();
        }
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::event::Segment;
    use crate::capture::fake::FakeBackend;

    fn controller() -> (CaptureController, crate::capture::fake::FakeBackendHandle) {
        let (backend, handle) = FakeBackend::new();
        (
            CaptureController::new(Box::new(backend), CaptureConfig::default()),
            handle,
        )
    }

    #[test]
    fn test_start_passes_fixed_settings() {
        let (mut controller, handle) = controller();
        assert!(controller.start_listening());
        let settings = handle.last_settings().unwrap();
        assert_eq!(settings.language, "zh-CN");
        assert!(settings.interim_results);
        assert!(!settings.continuous);
        assert_eq!(settings.max_alternatives, 1);
    }

    #[test]
    fn test_double_start_opens_one_session() {
        let (mut controller, handle) = controller();
        assert!(controller.start_listening());
        assert!(!controller.start_listening());
        assert_eq!(handle.starts(), 1);
        assert!(controller.is_listening());
    }

    #[test]
    fn test_interim_then_final_reports_once() {
        let (mut controller, _handle) = controller();
        controller.start_listening();

        let mut notifications = Vec::new();
        for event in [
            CaptureEvent::Started,
            CaptureEvent::Result {
                segments: vec![Segment::interim("你好")],
            },
            CaptureEvent::Result {
                segments: vec![Segment::final_("你好世界")],
            },
            CaptureEvent::Ended,
        ] {
            if let Some(text) = controller.handle_event(event) {
                notifications.push(text);
            }
        }

        assert_eq!(notifications, vec!["你好世界".to_string()]);
        assert_eq!(controller.phase(), CapturePhase::Idle);
        assert!(controller.transcript().is_empty());
    }

    #[test]
    fn test_interim_visible_while_listening() {
        let (mut controller, _handle) = controller();
        controller.start_listening();
        controller.handle_event(CaptureEvent::Result {
            segments: vec![Segment::interim("我想")],
        });
        assert_eq!(controller.transcript(), "我想");
        assert!(!controller.state().is_final);
    }

    #[test]
    fn test_stop_requests_backend_stop_and_waits_for_end() {
        let (mut controller, handle) = controller();
        controller.start_listening();
        controller.handle_event(CaptureEvent::Result {
            segments: vec![Segment::interim("帮我")],
        });

        assert!(controller.stop_listening());
        assert_eq!(handle.stops(), 1);
        assert!(controller.is_listening());

        let finalized = controller.handle_event(CaptureEvent::Ended);
        assert_eq!(finalized.as_deref(), Some("帮我"));
        assert!(!controller.stop_listening());
    }

    #[test]
    fn test_error_returns_to_idle_with_code() {
        let (mut controller, _handle) = controller();
        controller.start_listening();
        let finalized = controller.handle_event(CaptureEvent::Error {
            code: "not-allowed".to_string(),
        });
        assert!(finalized.is_none());
        assert!(!controller.is_listening());
        assert_eq!(controller.last_error(), Some(&CaptureError::PermissionDenied));

        assert!(controller.start_listening());
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_backend_start_failure_leaves_idle() {
        let (backend, handle) = FakeBackend::failing_start();
        let mut controller = CaptureController::new(Box::new(backend), CaptureConfig::default());

        assert!(!controller.start_listening());
        assert_eq!(handle.starts(), 0);
        assert_eq!(controller.phase(), CapturePhase::Idle);
        assert_eq!(
            controller.last_error(),
            Some(&CaptureError::Other("start-failed".to_string()))
        );
    }

    #[test]
    fn test_unsupported_is_permanent_noop() {
        let (backend, handle) = FakeBackend::unsupported();
        let mut controller = CaptureController::new(Box::new(backend), CaptureConfig::default());

        assert!(!controller.is_supported());
        assert_eq!(controller.availability(), Err(CaptureError::Unsupported));
        assert!(!controller.start_listening());
        assert!(!controller.stop_listening());
        assert!(controller
            .handle_event(CaptureEvent::Result {
                segments: vec![Segment::final_("x")],
            })
            .is_none());
        assert_eq!(handle.starts(), 0);
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_reset_twice_is_clean() {
        let (mut controller, _handle) = controller();
        controller.start_listening();
        controller.handle_event(CaptureEvent::Error {
            code: "no-speech".to_string(),
        });

        controller.reset();
        assert!(controller.transcript().is_empty());
        assert!(controller.last_error().is_none());
        controller.reset();
        assert!(controller.transcript().is_empty());
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_drop_while_listening_stops_backend() {
        let (mut controller, handle) = controller();
        controller.start_listening();
        drop(controller);
        assert_eq!(handle.stops(), 1);
    }

    #[test]
    fn test_drop_while_idle_does_not_stop() {
        let (controller, handle) = controller();
        drop(controller);
        assert_eq!(handle.stops(), 0);
    }
}
