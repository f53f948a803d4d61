use crate::types::PixelFrame;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_STRIDE: usize = 8;
pub const DEFAULT_DARK_THRESHOLD: f64 = 90.0;
pub const DEFAULT_DARKNESS_PROPORTION: f64 = 0.08;

/// Darkness classification of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrightnessVerdict {
    pub is_dark: bool,
    pub dark_count: usize,
    pub sampled_count: usize,
    /// Share of sampled pixels below the dark threshold (0.0-1.0)
    pub dark_proportion: f64,
}

/// Classifies a frame as dark when a meaningful minority of sampled pixels is dark,
/// so a few bright highlights cannot hide an otherwise dark scene.
#[derive(Debug, Clone)]
pub struct BrightnessAnalyzer {
    /// Analyze every Nth pixel
    pub sample_stride: usize,
    /// Per-pixel mean RGB below which a pixel counts as dark
    pub dark_threshold: f64,
    /// Dark share above which the whole frame is dark
    pub darkness_proportion: f64,
}

impl BrightnessAnalyzer {
    pub fn new(sample_stride: usize, dark_threshold: f64, darkness_proportion: f64) -> Self {
        Self {
            sample_stride: sample_stride.max(1),
            dark_threshold,
            darkness_proportion,
        }
    }

    pub fn analyze(&self, frame: &PixelFrame) -> BrightnessVerdict {
        let stride = self.sample_stride.max(1);
        let mut dark_count = 0usize;
        let mut sampled_count = 0usize;

        for [r, g, b] in frame.pixels().step_by(stride) {
            let brightness = (r as f64 + g as f64 + b as f64) / 3.0;
            if brightness < self.dark_threshold {
                dark_count += 1;
            }
            sampled_count += 1;
        }

        // An empty frame has nothing dark in it; the blur check rejects it instead.
        let dark_proportion = if sampled_count == 0 {
            0.0
        } else {
            dark_count as f64 / sampled_count as f64
        };
        let is_dark = dark_proportion > self.darkness_proportion;

        log::debug!(
            "Brightness: {} of {} sampled pixels dark ({:.4}), dark={}",
            dark_count,
            sampled_count,
            dark_proportion,
            is_dark
        );

        BrightnessVerdict {
            is_dark,
            dark_count,
            sampled_count,
            dark_proportion,
        }
    }
}

impl Default for BrightnessAnalyzer {
    fn default() -> Self {
        Self::new(
            DEFAULT_SAMPLE_STRIDE,
            DEFAULT_DARK_THRESHOLD,
            DEFAULT_DARKNESS_PROPORTION,
        )
    }
}
