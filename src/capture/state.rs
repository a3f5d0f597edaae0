//! Capture state and error taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Whether a capture session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapturePhase {
    #[default]
    Idle,
    Listening,
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Listening => write!(f, "listening"),
        }
    }
}

/// Normalized speech capture failures
///
/// Platform error codes are folded into this fixed set by
/// [`CaptureError::from_platform_code`]; anything unrecognized keeps its raw
/// code in [`CaptureError::Other`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The environment has no speech capture at all
    #[error("Speech capture is not available in this environment")]
    Unsupported,

    /// The session ended without detecting speech
    #[error("No speech was detected")]
    NoSpeech,

    /// The microphone could not be acquired
    #[error("Microphone is unavailable")]
    AudioUnavailable,

    /// The user or the system denied microphone access
    #[error("Microphone permission was denied")]
    PermissionDenied,

    /// The recognition service could not be reached
    #[error("Speech recognition service is unreachable")]
    Network,

    /// Unclassified platform error
    #[error("Speech recognition failed: {0}")]
    Other(String),
}

impl CaptureError {
    /// Fold a platform error code into the taxonomy
    ///
    /// # Examples
    ///
    /// ```
    /// use fitcoach::capture::CaptureError;
    ///
    /// assert_eq!(CaptureError::from_platform_code("not-allowed"), CaptureError::PermissionDenied);
    /// assert_eq!(
    ///     CaptureError::from_platform_code("bad-grammar"),
    ///     CaptureError::Other("bad-grammar".to_string())
    /// );
    /// ```
    pub fn from_platform_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioUnavailable,
            "not-allowed" | "service-not-allowed" => Self::PermissionDenied,
            "network" => Self::Network,
            other => Self::Other(other.to_string()),
        }
    }

    /// Stable short code, suitable for logs and diagnostics
    pub fn code(&self) -> &str {
        match self {
            Self::Unsupported => "unsupported",
            Self::NoSpeech => "no-speech",
            Self::AudioUnavailable => "audio-capture",
            Self::PermissionDenied => "not-allowed",
            Self::Network => "network",
            Self::Other(code) => code,
        }
    }
}

/// Observable state of the capture machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureState {
    pub phase: CapturePhase,
    /// Best-effort text of the open (or just-ended) session
    pub transcript: String,
    /// True when `transcript` came from final segments only
    pub is_final: bool,
    pub last_error: Option<CaptureError>,
}

impl CaptureState {
    pub fn is_listening(&self) -> bool {
        self.phase == CapturePhase::Listening
    }
}
