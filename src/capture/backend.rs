//! Platform speech capture seam
//!
//! A [`SpeechBackend`] opens and closes recognition sessions. Recognition
//! results flow back separately, as [`CaptureEvent`](crate::capture::CaptureEvent)s
//! handed to the controller by whoever owns the platform callbacks.

use crate::capture::state::CaptureError;
use crate::config::CaptureConfig;
use crate::error::Result;

/// Platform speech-to-text capability
pub trait SpeechBackend: Send {
    /// Whether this environment can capture speech at all
    ///
    /// Queried once, when the controller is created.
    fn is_supported(&self) -> bool;

    /// Open a recognition session with the given settings
    ///
    /// # Errors
    ///
    /// Returns error if the platform refuses to start
    fn start(&mut self, settings: &CaptureConfig) -> Result<()>;

    /// Ask the open session to stop
    ///
    /// The platform is still expected to deliver end-of-session afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the request
    fn stop(&mut self) -> Result<()>;
}

/// Backend for environments without speech capture
///
/// Used by the terminal front end, which has no recognizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

impl SpeechBackend for UnsupportedBackend {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self, _settings: &CaptureConfig) -> Result<()> {
        Err(CaptureError::Unsupported.into())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}
