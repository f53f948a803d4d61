//! Frame delivery boundary
//!
//! The camera collaborator owns acquisition and decoding; the core only pulls
//! the most recent frame when it needs one.

use crate::errors::GateError;
use crate::types::PixelFrame;
use std::sync::{Arc, PoisonError, RwLock};

/// Pull-based access to the most recent decoded frame.
pub trait FrameSource: Send + Sync {
    /// Fails with [`GateError::NoFrameAvailable`] until the camera has produced a frame.
    fn current_frame(&self) -> Result<PixelFrame, GateError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Arc<T> {
    fn current_frame(&self) -> Result<PixelFrame, GateError> {
        (**self).current_frame()
    }
}

/// Latest-wins slot that a push-based camera callback publishes into.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    slot: Arc<RwLock<Option<PixelFrame>>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame.
    pub fn publish(&self, frame: PixelFrame) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    /// Forget the current frame, as when the camera stops.
    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl FrameSource for LatestFrame {
    fn current_frame(&self) -> Result<PixelFrame, GateError> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(GateError::NoFrameAvailable)
    }
}
