//! shutterguard: quality-gated photo capture
//!
//! Holds off committing a photo until the live camera frame is good enough:
//! the device has stopped moving, the scene is not dark and the image is not
//! blurred. A capture attempt either commits one frame or times out.
//!
//! # Features
//! - Debounced motion detection from accelerometer events
//! - Sampled darkness detection
//! - Laplacian-variance blur detection
//! - Time-bounded capture state machine with race-free supersession
//! - Single-task tokio session driving all timers
//!
//! # Usage
//! ```rust,ignore
//! use shutterguard::{CaptureSession, GateConfig, LatestFrame, StaticPermissions};
//!
//! let frames = LatestFrame::new();
//! let session = CaptureSession::start(GateConfig::default(), frames.clone(), &StaticPermissions::granted())?;
//!
//! // camera callback: frames.publish(frame);
//! // sensor callback: session.push_motion(sample)?;
//!
//! match session.capture().await? {
//!     CaptureOutcome::Success(photo) => save(photo.to_png()?),
//!     CaptureOutcome::Timeout(reason) => show(reason),
//! }
//! ```
pub mod capture;
pub mod config;
pub mod errors;
pub mod motion;
pub mod permissions;
pub mod quality;
pub mod session;
pub mod source;
pub mod timing;
pub mod types;

// Testing utilities - synthetic data for offline testing
pub mod testing;

// Re-exports for convenience
pub use capture::{CaptureAttempt, CaptureOrchestrator, CaptureOutcome, CapturePhase, CapturedPhoto};
pub use config::GateConfig;
pub use errors::GateError;
pub use motion::{MotionState, MotionTracker};
pub use permissions::{PermissionGate, PermissionStatus, StaticPermissions};
pub use quality::{BlurAnalyzer, BrightnessAnalyzer, QualityGate, QualityVerdict, Sharpness};
pub use session::{CaptureSession, CaptureTicket, LiveStatus, SessionHandle};
pub use source::{FrameSource, LatestFrame};
pub use timing::{SessionClock, Timestamp};
pub use types::{MotionSample, OrientationSample, PixelFrame, PixelLayout, Vec3};

/// Initialize logging
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "shutterguard=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
