use crate::capture::CapturePhase;
use crate::motion::MotionTelemetry;
use crate::quality::{QualityVerdict, Sharpness};
use crate::timing::Timestamp;
use serde::{Deserialize, Serialize};

/// Snapshot published after every event the session handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub active: bool,
    pub verdict: QualityVerdict,
    pub acceptable: bool,
    pub sharpness: Sharpness,
    /// Non-empty only while the device is moving
    pub motion_warning: String,
    pub phase: CapturePhase,
    /// Result text of the last finished attempt
    pub message: String,
    pub telemetry: MotionTelemetry,
    pub last_assessed_at: Option<Timestamp>,
}

impl Default for LiveStatus {
    fn default() -> Self {
        Self {
            active: false,
            verdict: QualityVerdict::new(true, true, false),
            acceptable: false,
            sharpness: Sharpness::Indeterminate,
            motion_warning: String::new(),
            phase: CapturePhase::Idle,
            message: String::new(),
            telemetry: MotionTelemetry::default(),
            last_assessed_at: None,
        }
    }
}
