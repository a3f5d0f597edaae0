//! Pure transition function of the capture machine
//!
//! `transition` never touches the backend. It returns the next state plus
//! the effects the controller must carry out, which keeps every ordering
//! rule testable without a microphone.

use crate::capture::event::{CaptureEvent, Segment};
use crate::capture::state::{CaptureError, CapturePhase, CaptureState};

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend to open a session
    OpenSession,
    /// Ask the backend to stop the open session
    CloseSession,
    /// Hand a completed transcript to the owner, exactly once
    EmitTranscript(String),
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: CaptureState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: &CaptureState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }

    fn to(state: CaptureState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// Visible text for one result event
///
/// Final segments supersede interim ones: if the event carries any final
/// text, only final text is shown.
pub fn visible_transcript(segments: &[Segment]) -> (String, bool) {
    let finals: String = segments
        .iter()
        .filter(|s| s.is_final)
        .map(|s| s.text.as_str())
        .collect();
    if !finals.is_empty() {
        return (finals, true);
    }
    let interim = segments
        .iter()
        .filter(|s| !s.is_final)
        .map(|s| s.text.as_str())
        .collect();
    (interim, false)
}

/// Compute the next state for `event`
///
/// Platform events that arrive while idle belong to a session that has
/// already been closed or failed, and are dropped.
pub fn transition(state: &CaptureState, event: &CaptureEvent) -> Transition {
    use CapturePhase::{Idle, Listening};

    match (state.phase, event) {
        (Idle, CaptureEvent::StartRequested) => Transition::to(
            CaptureState {
                phase: Listening,
                ..CaptureState::default()
            },
            vec![Effect::OpenSession],
        ),
        (Listening, CaptureEvent::StartRequested) => Transition::stay(state),

        (Listening, CaptureEvent::StopRequested) => {
            Transition::to(state.clone(), vec![Effect::CloseSession])
        }
        (Idle, CaptureEvent::StopRequested) => Transition::stay(state),

        (phase, CaptureEvent::ResetRequested) => Transition::to(
            CaptureState {
                phase,
                ..CaptureState::default()
            },
            Vec::new(),
        ),

        (_, CaptureEvent::StartFailed) => Transition::to(
            CaptureState {
                last_error: Some(CaptureError::Other("start-failed".to_string())),
                ..CaptureState::default()
            },
            Vec::new(),
        ),

        (Listening, CaptureEvent::Started) => Transition::to(
            CaptureState {
                last_error: None,
                ..state.clone()
            },
            Vec::new(),
        ),

        (Listening, CaptureEvent::Result { segments }) => {
            let (transcript, is_final) = visible_transcript(segments);
            Transition::to(
                CaptureState {
                    transcript,
                    is_final,
                    ..state.clone()
                },
                Vec::new(),
            )
        }

        // Listening -> idle through end-of-session is the only edge that
        // emits; the emitted text is cleared in the same step.
        (Listening, CaptureEvent::Ended) => {
            let effects = if state.transcript.is_empty() {
                Vec::new()
            } else {
                vec![Effect::EmitTranscript(state.transcript.clone())]
            };
            Transition::to(
                CaptureState {
                    phase: Idle,
                    transcript: String::new(),
                    is_final: false,
                    last_error: state.last_error.clone(),
                },
                effects,
            )
        }

        (Listening, CaptureEvent::Error { code }) => Transition::to(
            CaptureState {
                last_error: Some(CaptureError::from_platform_code(code)),
                ..CaptureState::default()
            },
            Vec::new(),
        ),

        (
            Idle,
            CaptureEvent::Started
            | CaptureEvent::Result { .. }
            | CaptureEvent::Ended
            | CaptureEvent::Error { .. },
        ) => Transition::stay(state),
    }
}
