//! Fuzz-style tests using proptest
//!
//! These provide fuzz-like testing without requiring nightly Rust or cargo-fuzz.
//! Run with: cargo test --test fuzz_tests

use proptest::prelude::*;
use shutterguard::quality::FrameAnalyzer;
use shutterguard::testing::motion_sample;
use shutterguard::{
    BlurAnalyzer, BrightnessAnalyzer, MotionTracker, PixelFrame, PixelLayout, QualityGate,
    QualityVerdict, Timestamp,
};

fn frame_strategy() -> impl Strategy<Value = PixelFrame> {
    (0u32..24, 0u32..24, prop::bool::ANY).prop_flat_map(|(w, h, alpha)| {
        let layout = if alpha {
            PixelLayout::Rgba8
        } else {
            PixelLayout::Rgb8
        };
        let len = (w * h) as usize * layout.channels();
        prop::collection::vec(any::<u8>(), len)
            .prop_map(move |data| PixelFrame::new(w, h, layout, data).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Arbitrary buffers never panic the frame constructor, only return errors
    #[test]
    fn fuzz_frame_construction(
        width in 0u32..64,
        height in 0u32..64,
        data in prop::collection::vec(any::<u8>(), 0..4096),
    ) {
        let expected = (width * height * 3) as usize;
        let result = PixelFrame::from_rgb(width, height, data.clone());
        prop_assert_eq!(result.is_ok(), data.len() == expected);
    }

    /// The analyzers accept any well-formed frame and produce finite statistics
    #[test]
    fn fuzz_analyzers_never_panic(frame in frame_strategy()) {
        let brightness = BrightnessAnalyzer::default().analyze(&frame);
        prop_assert!(brightness.dark_count <= brightness.sampled_count);
        prop_assert!((0.0..=1.0).contains(&brightness.dark_proportion));

        let blur = BlurAnalyzer::default().analyze(&frame);
        prop_assert!(blur.variance.is_finite());
        prop_assert!(blur.variance >= 0.0);
        if frame.width() < 3 || frame.height() < 3 {
            prop_assert!(blur.is_blurred);
        }
    }

    /// A dark frame is never reported as blurred
    #[test]
    fn fuzz_dark_frames_are_not_blurred(frame in frame_strategy()) {
        let assessment = FrameAnalyzer::default().assess(&frame, Timestamp::ZERO);
        if assessment.is_dark {
            prop_assert!(!assessment.is_blurred());
            prop_assert!(assessment.blur.is_none());
        }
    }

    /// Any sample above the threshold flags motion immediately
    #[test]
    fn fuzz_motion_above_threshold_is_immediate(
        history in prop::collection::vec(0.0f64..2.0, 0..20),
        magnitude in 0.600_001f64..50.0,
    ) {
        let mut tracker = MotionTracker::default();
        let mut t = 0u64;
        for m in history {
            tracker.on_sample(&motion_sample(Timestamp::from_millis(t), m));
            t += 16;
        }

        let state = tracker.on_sample(&motion_sample(Timestamp::from_millis(t), magnitude));
        prop_assert!(state.is_moving);
        prop_assert!(state.pending_still_since.is_none());
    }

    /// Stillness is only reported after an uninterrupted still period
    #[test]
    fn fuzz_still_requires_debounce(
        still_after in 0u64..2_000,
        probe in 0u64..499,
    ) {
        let mut tracker = MotionTracker::default();
        tracker.on_sample(&motion_sample(Timestamp::ZERO, 1.0));
        tracker.on_sample(&motion_sample(Timestamp::from_millis(still_after), 0.1));

        tracker.expire(Timestamp::from_millis(still_after + probe));
        prop_assert!(tracker.is_moving());

        tracker.expire(Timestamp::from_millis(still_after + 500));
        prop_assert!(!tracker.is_moving());
    }

    /// The gate accepts exactly the all-clear verdict
    #[test]
    fn fuzz_gate_is_conjunction(dark: bool, blurred: bool, moving: bool) {
        let verdict = QualityVerdict::new(dark, blurred, moving);
        prop_assert_eq!(QualityGate.evaluate(&verdict), !dark && !blurred && !moving);
        prop_assert_eq!(QualityGate.motion_warning(&verdict).is_empty(), !moving);
    }
}
