//! Voice capture
//!
//! This module presents platform speech-to-text as an explicit state machine:
//!
//! - `state`: phase, transcript and the normalized error taxonomy
//! - `event`: the tagged union of owner requests and platform events
//! - `transition`: the pure transition function and its effects
//! - `backend`: the [`SpeechBackend`] platform seam
//! - `controller`: [`CaptureController`], which runs effects against a backend
//! - `fake`: an in-process backend for tests
//!
//! ```text
//!          start_listening              Ended / Error
//!   idle ------------------> listening ---------------> idle
//! ```

pub mod backend;
pub mod controller;
pub mod event;
pub mod fake;
pub mod state;
pub mod transition;

pub use backend::{SpeechBackend, UnsupportedBackend};
pub use controller::CaptureController;
pub use event::{CaptureEvent, Segment};
pub use state::{CaptureError, CapturePhase, CaptureState};
pub use transition::{transition, Effect, Transition};
