//! In-process fake speech backend for tests
//!
//! [`FakeBackend::new`] returns the backend together with a
//! [`FakeBackendHandle`] that shares its call log, so a test can hand the
//! backend to a controller and still observe what the controller asked of it.
//!
//! # Example
//!
//! ```
//! use fitcoach::capture::fake::FakeBackend;
//! use fitcoach::capture::{CaptureController, CaptureEvent};
//! use fitcoach::config::CaptureConfig;
//!
//! let (backend, handle) = FakeBackend::new();
//! let mut controller = CaptureController::new(Box::new(backend), CaptureConfig::default());
//!
//! controller.start_listening();
//! controller.start_listening();
//! assert_eq!(handle.starts(), 1);
//!
//! controller.handle_event(CaptureEvent::Ended);
//! assert!(!controller.is_listening());
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use crate::capture::backend::SpeechBackend;
use crate::config::CaptureConfig;
use crate::error::Result;

#[derive(Debug, Default)]
struct CallLog {
    starts: usize,
    stops: usize,
    last_settings: Option<CaptureConfig>,
}

/// Scriptable speech backend that records every call
#[derive(Debug)]
pub struct FakeBackend {
    supported: bool,
    fail_start: bool,
    log: Arc<Mutex<CallLog>>,
}

/// Test-side view of a [`FakeBackend`]'s call log
#[derive(Debug, Clone)]
pub struct FakeBackendHandle {
    log: Arc<Mutex<CallLog>>,
}

fn lock(log: &Mutex<CallLog>) -> MutexGuard<'_, CallLog> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeBackend {
    /// Create a supported backend whose sessions always start
    pub fn new() -> (Self, FakeBackendHandle) {
        Self::build(true, false)
    }

    /// Create a backend that reports speech capture as unavailable
    pub fn unsupported() -> (Self, FakeBackendHandle) {
        Self::build(false, false)
    }

    /// Create a supported backend that refuses every start
    pub fn failing_start() -> (Self, FakeBackendHandle) {
        Self::build(true, true)
    }

    fn build(supported: bool, fail_start: bool) -> (Self, FakeBackendHandle) {
        let log = Arc::new(Mutex::new(CallLog::default()));
        let backend = Self {
            supported,
            fail_start,
            log: Arc::clone(&log),
        };
        (backend, FakeBackendHandle { log })
    }
}

impl SpeechBackend for FakeBackend {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self, settings: &CaptureConfig) -> Result<()> {
        if self.fail_start {
            return Err(anyhow::anyhow!("recognizer busy"));
        }
        let mut log = lock(&self.log);
        log.starts += 1;
        log.last_settings = Some(settings.clone());
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        lock(&self.log).stops += 1;
        Ok(())
    }
}

impl FakeBackendHandle {
    /// Number of sessions opened
    pub fn starts(&self) -> usize {
        lock(&self.log).starts
    }

    /// Number of stop requests
    pub fn stops(&self) -> usize {
        lock(&self.log).stops
    }

    /// Settings passed to the most recent successful start
    pub fn last_settings(&self) -> Option<CaptureConfig> {
        lock(&self.log).last_settings.clone()
    }
}
