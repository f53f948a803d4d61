//! Quality-gated capture
//!
//! Polls the quality gate on a fixed cadence while an attempt is live and
//! commits either one captured frame or one timeout per attempt.
pub mod orchestrator;
pub mod photo;

pub use orchestrator::{
    CaptureAttempt, CaptureOrchestrator, CaptureOutcome, CapturePhase, DEFAULT_CAPTURE_TIMEOUT,
    DEFAULT_POLL_INTERVAL, SUCCESS_MESSAGE, TIMEOUT_REASON,
};
pub use photo::CapturedPhoto;
