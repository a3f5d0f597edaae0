//! Inputs to the capture state machine

/// A recognized span of speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// False for interim text that may still be revised
    pub is_final: bool,
}

impl Segment {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Everything that can move the capture machine
///
/// The first four variants are requests made by the owner of the
/// controller; the rest are delivered by the platform backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Owner asked to open a session
    StartRequested,
    /// Owner asked to end the open session early
    StopRequested,
    /// Owner consumed the transcript and wants a clean slate
    ResetRequested,
    /// The backend refused to open the session
    StartFailed,

    /// Platform confirmed the session is open
    Started,
    /// Platform delivered recognition results since the session began
    Result { segments: Vec<Segment> },
    /// Platform closed the session
    Ended,
    /// Platform reported a failure with its raw error code
    Error { code: String },
}
