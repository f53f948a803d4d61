/// Frame quality analysis
///
/// Darkness and blur verdicts computed from pixel buffers, and the gate that
/// combines them with the motion flag into a single accept decision.
pub mod blur;
pub mod brightness;
pub mod gate;

pub use blur::{BlurAnalyzer, BlurVerdict, Sharpness};
pub use brightness::{BrightnessAnalyzer, BrightnessVerdict};
pub use gate::{FrameAnalyzer, FrameAssessment, QualityGate, QualityVerdict, MOTION_WARNING};
