use super::blur::{BlurAnalyzer, BlurVerdict, Sharpness};
use super::brightness::{BrightnessAnalyzer, BrightnessVerdict};
use crate::motion::MotionState;
use crate::timing::Timestamp;
use crate::types::PixelFrame;
use serde::{Deserialize, Serialize};

pub const MOTION_WARNING: &str = "Please hold the device steady while taking the photo.";

/// The three quality signals for one tick. Always replaced as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub is_dark: bool,
    pub is_blurred: bool,
    pub is_moving: bool,
}

impl QualityVerdict {
    pub fn new(is_dark: bool, is_blurred: bool, is_moving: bool) -> Self {
        Self {
            is_dark,
            is_blurred,
            is_moving,
        }
    }

    /// Combine the latest frame assessment with the current motion state.
    ///
    /// Without any assessment yet there is no evidence the frame is usable, so
    /// it counts as both dark and blurred.
    pub fn combine(assessment: Option<&FrameAssessment>, motion: MotionState) -> Self {
        match assessment {
            Some(a) => Self::new(a.is_dark, a.is_blurred(), motion.is_moving),
            None => Self::new(true, true, motion.is_moving),
        }
    }
}

/// Accept/reject predicate over a [`QualityVerdict`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGate;

impl QualityGate {
    pub fn evaluate(&self, verdict: &QualityVerdict) -> bool {
        !verdict.is_moving && !verdict.is_dark && !verdict.is_blurred
    }

    /// User-facing instruction, non-empty exactly when the device is moving.
    pub fn motion_warning(&self, verdict: &QualityVerdict) -> &'static str {
        if verdict.is_moving {
            MOTION_WARNING
        } else {
            ""
        }
    }
}

/// Output of one run of the live analysis loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAssessment {
    pub is_dark: bool,
    pub sharpness: Sharpness,
    pub brightness: BrightnessVerdict,
    /// Absent when blur was skipped for a dark frame
    pub blur: Option<BlurVerdict>,
    pub assessed_at: Timestamp,
}

impl FrameAssessment {
    /// Only a positive blur result counts; an indeterminate frame is not blurred.
    pub fn is_blurred(&self) -> bool {
        self.sharpness == Sharpness::Blurred
    }
}

/// Brightness and blur analysis for the live status loop.
#[derive(Debug, Clone, Default)]
pub struct FrameAnalyzer {
    pub brightness: BrightnessAnalyzer,
    pub blur: BlurAnalyzer,
}

impl FrameAnalyzer {
    pub fn new(brightness: BrightnessAnalyzer, blur: BlurAnalyzer) -> Self {
        Self { brightness, blur }
    }

    /// Blur is only evaluated on frames that are not dark.
    pub fn assess(&self, frame: &PixelFrame, now: Timestamp) -> FrameAssessment {
        let brightness = self.brightness.analyze(frame);

        let (sharpness, blur) = if brightness.is_dark {
            (Sharpness::Indeterminate, None)
        } else {
            let blur = self.blur.analyze(frame);
            (blur.sharpness(), Some(blur))
        };

        FrameAssessment {
            is_dark: brightness.is_dark,
            sharpness,
            brightness,
            blur,
            assessed_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> MotionState {
        MotionState::default()
    }

    #[test]
    fn test_gate_requires_all_three_signals() {
        let gate = QualityGate;
        assert!(gate.evaluate(&QualityVerdict::new(false, false, false)));
        assert!(!gate.evaluate(&QualityVerdict::new(true, false, false)));
        assert!(!gate.evaluate(&QualityVerdict::new(false, true, false)));
        assert!(!gate.evaluate(&QualityVerdict::new(false, false, true)));
    }

    #[test]
    fn test_motion_warning_only_for_motion() {
        let gate = QualityGate;
        assert_eq!(gate.motion_warning(&QualityVerdict::new(true, true, false)), "");
        assert_eq!(
            gate.motion_warning(&QualityVerdict::new(false, false, true)),
            MOTION_WARNING
        );
    }

    #[test]
    fn test_missing_assessment_is_rejected() {
        let verdict = QualityVerdict::combine(None, still());
        assert!(!QualityGate.evaluate(&verdict));
        assert!(!verdict.is_moving);
    }

    #[test]
    fn test_dark_frame_skips_blur() {
        let frame = PixelFrame::from_rgb(8, 8, vec![0u8; 8 * 8 * 3]).unwrap();
        let assessment = FrameAnalyzer::default().assess(&frame, Timestamp::ZERO);
        assert!(assessment.is_dark);
        assert_eq!(assessment.sharpness, Sharpness::Indeterminate);
        assert!(assessment.blur.is_none());
        assert!(!assessment.is_blurred());

        let verdict = QualityVerdict::combine(Some(&assessment), still());
        assert_eq!(verdict, QualityVerdict::new(true, false, false));
    }

    #[test]
    fn test_bright_flat_frame_is_blurred() {
        let frame = PixelFrame::from_rgb(8, 8, vec![200u8; 8 * 8 * 3]).unwrap();
        let assessment = FrameAnalyzer::default().assess(&frame, Timestamp::from_millis(500));
        assert!(!assessment.is_dark);
        assert_eq!(assessment.sharpness, Sharpness::Blurred);
        assert_eq!(assessment.assessed_at, Timestamp::from_millis(500));
        assert!(assessment.blur.is_some());
    }
}
