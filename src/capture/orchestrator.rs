use super::photo::CapturedPhoto;
use crate::errors::GateError;
use crate::quality::{QualityGate, QualityVerdict};
use crate::source::FrameSource;
use crate::timing::{IntervalTimer, Timer, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_millis(2000);

pub const TIMEOUT_REASON: &str = "device not steady / scene too dark / image not clear";
pub const SUCCESS_MESSAGE: &str = "Photo captured successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapturePhase {
    Idle,
    Polling,
    Captured,
    TimedOut,
}

/// Terminal result of a capture attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Success(CapturedPhoto),
    Timeout(String),
}

impl CaptureOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureOutcome::Success(_))
    }

    /// Status text shown to the user for this outcome
    pub fn message(&self) -> &str {
        match self {
            CaptureOutcome::Success(_) => SUCCESS_MESSAGE,
            CaptureOutcome::Timeout(reason) => reason,
        }
    }
}

/// One bounded capture session with at most one terminal outcome
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureAttempt {
    pub id: Uuid,
    pub start_time: Timestamp,
    pub deadline: Timestamp,
    pub outcome: Option<CaptureOutcome>,
}

/// Capture state machine: `Idle -> Polling -> {Captured | TimedOut} -> Idle`.
///
/// Owns the poll timer. Starting a new attempt re-arms that single timer, so
/// a superseded attempt has nothing left that could fire.
#[derive(Debug)]
pub struct CaptureOrchestrator {
    gate: QualityGate,
    timeout: Duration,
    poll_timer: IntervalTimer,
    phase: CapturePhase,
    attempt: Option<CaptureAttempt>,
    message: String,
}

impl CaptureOrchestrator {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            gate: QualityGate,
            timeout,
            poll_timer: IntervalTimer::new(poll_interval),
            phase: CapturePhase::Idle,
            attempt: None,
            message: String::new(),
        }
    }

    /// Begin a new attempt, superseding any attempt still polling.
    pub fn start_capture(&mut self, now: Timestamp) -> CaptureAttempt {
        self.poll_timer.cancel();

        if let Some(previous) = self.attempt.as_ref() {
            if self.phase == CapturePhase::Polling {
                log::info!("Capture attempt {} superseded", previous.id);
            }
        }

        let attempt = CaptureAttempt {
            id: Uuid::new_v4(),
            start_time: now,
            deadline: now + self.timeout,
            outcome: None,
        };
        log::info!(
            "Starting capture attempt {} (timeout {:?})",
            attempt.id,
            self.timeout
        );

        self.attempt = Some(attempt.clone());
        self.phase = CapturePhase::Polling;
        self.message.clear();
        self.poll_timer.start(now);
        attempt
    }

    /// One poll of the current attempt.
    ///
    /// Accepts the current frame when the gate passes; otherwise times the
    /// attempt out once more than the timeout has elapsed since it started.
    /// Returns the outcome at most once per attempt.
    pub fn on_tick(
        &mut self,
        now: Timestamp,
        verdict: &QualityVerdict,
        frames: &dyn FrameSource,
    ) -> Option<CaptureOutcome> {
        if self.phase != CapturePhase::Polling {
            return None;
        }
        let attempt = self.attempt.as_ref()?;
        if attempt.outcome.is_some() {
            return None;
        }
        let (id, start_time) = (attempt.id, attempt.start_time);

        if self.gate.evaluate(verdict) {
            match frames.current_frame() {
                Ok(frame) => {
                    let photo = CapturedPhoto::new(id, frame, now);
                    log::info!(
                        "Capture attempt {} accepted {}x{} frame after {:?}",
                        id,
                        photo.width(),
                        photo.height(),
                        now.saturating_since(start_time)
                    );
                    return Some(self.finish(CapturePhase::Captured, CaptureOutcome::Success(photo)));
                }
                Err(GateError::NoFrameAvailable) => {
                    log::debug!("Capture tick skipped: no frame available");
                }
                Err(e) => {
                    log::warn!("Capture tick skipped: {}", e);
                }
            }
        }

        if now.saturating_since(start_time) > self.timeout {
            log::info!("Capture attempt {} timed out: {}", id, TIMEOUT_REASON);
            return Some(self.finish(
                CapturePhase::TimedOut,
                CaptureOutcome::Timeout(TIMEOUT_REASON.to_string()),
            ));
        }

        None
    }

    /// Run [`on_tick`](Self::on_tick) if the poll timer is due at `now`.
    pub fn poll(
        &mut self,
        now: Timestamp,
        verdict: &QualityVerdict,
        frames: &dyn FrameSource,
    ) -> Option<CaptureOutcome> {
        if self.poll_timer.fire(now) {
            self.on_tick(now, verdict, frames)
        } else {
            None
        }
    }

    /// Abandon any attempt and stop polling. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.poll_timer.cancel();
        if self.phase == CapturePhase::Polling {
            if let Some(attempt) = self.attempt.take() {
                log::info!("Capture attempt {} cancelled", attempt.id);
            }
            self.phase = CapturePhase::Idle;
        }
    }

    /// Close a finished attempt (e.g. the user dismissed the photo) and return to idle.
    pub fn dismiss(&mut self) {
        if matches!(self.phase, CapturePhase::Captured | CapturePhase::TimedOut) {
            self.attempt = None;
            self.phase = CapturePhase::Idle;
            self.message.clear();
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn attempt(&self) -> Option<&CaptureAttempt> {
        self.attempt.as_ref()
    }

    pub fn is_polling(&self) -> bool {
        self.phase == CapturePhase::Polling
    }

    /// Last user-facing status message, empty while idle or polling.
    pub fn status_message(&self) -> &str {
        &self.message
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.poll_timer.deadline()
    }

    fn finish(&mut self, phase: CapturePhase, outcome: CaptureOutcome) -> CaptureOutcome {
        self.poll_timer.cancel();
        self.phase = phase;
        self.message = outcome.message().to_string();
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.outcome = Some(outcome.clone());
        }
        outcome
    }
}

impl Default for CaptureOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_CAPTURE_TIMEOUT)
    }
}
