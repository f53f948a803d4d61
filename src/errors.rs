use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    /// The camera has not delivered a decoded frame yet. Transient; callers skip the tick.
    #[error("No frame available")]
    NoFrameAvailable,

    #[error("Invalid frame buffer: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture attempt superseded by a newer attempt")]
    CaptureSuperseded,

    #[error("Capture session is closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl GateError {
    /// Transient errors are swallowed by the periodic ticks instead of being reported upward.
    pub fn is_transient(&self) -> bool {
        matches!(self, GateError::NoFrameAvailable)
    }
}
