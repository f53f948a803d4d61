use crate::types::PixelFrame;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BLUR_THRESHOLD: f64 = 30.0;

/// Perceptual luma weights for R, G and B
const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.587, 0.114];

/// Sharpness of a frame as seen by the live analysis loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sharpness {
    Sharp,
    Blurred,
    /// Blur was not evaluated, e.g. because the frame is too dark to judge
    Indeterminate,
}

/// Result of a Laplacian-variance blur check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurVerdict {
    pub is_blurred: bool,
    /// Population variance of the absolute Laplacian response
    pub variance: f64,
    /// Mean absolute Laplacian response
    pub mean: f64,
    /// Number of interior pixels the Laplacian was evaluated on
    pub interior_count: usize,
}

impl BlurVerdict {
    pub fn sharpness(&self) -> Sharpness {
        if self.is_blurred {
            Sharpness::Blurred
        } else {
            Sharpness::Sharp
        }
    }
}

/// Blur detector based on the variance of the 4-neighbour Laplacian.
///
/// Sharp frames have many strong local intensity changes and a high variance;
/// blurred frames have few. The 1-pixel border is skipped because the kernel
/// is undefined there.
#[derive(Debug, Clone)]
pub struct BlurAnalyzer {
    /// Variance below which a frame is blurred
    pub threshold: f64,
}

impl BlurAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn analyze(&self, frame: &PixelFrame) -> BlurVerdict {
        let width = frame.width() as usize;
        let height = frame.height() as usize;

        if width < 3 || height < 3 {
            log::debug!(
                "Blur: {}x{} frame has no interior pixels, treating as blurred",
                width,
                height
            );
            return BlurVerdict {
                is_blurred: true,
                variance: 0.0,
                mean: 0.0,
                interior_count: 0,
            };
        }

        let gray = luma_grid(frame);
        let responses = laplacian_magnitudes(&gray, width, height);

        let count = responses.len() as f64;
        let mean = responses.iter().sum::<f64>() / count;
        let variance = responses
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count;
        let is_blurred = variance < self.threshold;

        log::debug!(
            "Blur: Laplacian variance {:.2} (mean {:.2}), blurred={}",
            variance,
            mean,
            is_blurred
        );

        BlurVerdict {
            is_blurred,
            variance,
            mean,
            interior_count: responses.len(),
        }
    }
}

impl Default for BlurAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_THRESHOLD)
    }
}

/// Dense grayscale copy of the frame, row-major, one value per pixel.
fn luma_grid(frame: &PixelFrame) -> Vec<f64> {
    frame
        .pixels()
        .map(|[r, g, b]| {
            LUMA_WEIGHTS[0] * r as f64 + LUMA_WEIGHTS[1] * g as f64 + LUMA_WEIGHTS[2] * b as f64
        })
        .collect()
}

/// |Laplacian| for every interior pixel. Requires width and height >= 3.
fn laplacian_magnitudes(gray: &[f64], width: usize, height: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity((width - 2) * (height - 2));

    for y in 1..height - 1 {
        let row = y * width;
        for x in 1..width - 1 {
            let i = row + x;
            let value = -4.0 * gray[i] + gray[i - 1] + gray[i + 1] + gray[i - width] + gray[i + width];
            out.push(value.abs());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_from_gray(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PixelFrame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = f(x, y);
                data.extend_from_slice(&[v, v, v]);
            }
        }
        PixelFrame::from_rgb(width, height, data).unwrap()
    }

    #[test]
    fn test_uniform_frame_is_blurred() {
        let verdict = BlurAnalyzer::default().analyze(&frame_from_gray(32, 32, |_, _| 128));
        assert!(verdict.is_blurred);
        assert_eq!(verdict.variance, 0.0);
        assert_eq!(verdict.interior_count, 30 * 30);
    }

    #[test]
    fn test_degenerate_frames_are_blurred() {
        let analyzer = BlurAnalyzer::default();
        for (w, h) in [(0, 0), (1, 1), (2, 50), (50, 2)] {
            let verdict = analyzer.analyze(&frame_from_gray(w, h, |_, _| 255));
            assert!(verdict.is_blurred, "{w}x{h}");
            assert_eq!(verdict.interior_count, 0);
            assert!(verdict.variance.is_finite());
        }
    }

    #[test]
    fn test_single_bright_pixel_response() {
        // 3x3 with a bright centre: one interior pixel, one response.
        let frame = frame_from_gray(3, 3, |x, y| if x == 1 && y == 1 { 100 } else { 0 });
        let verdict = BlurAnalyzer::default().analyze(&frame);
        assert_eq!(verdict.interior_count, 1);
        assert!((verdict.mean - 4.0 * 100.0 * 0.9999).abs() < 1e-6);
        assert_eq!(verdict.variance, 0.0);
    }

    #[test]
    fn test_pixel_checkerboard_has_constant_magnitude() {
        // Every interior |Laplacian| is 4 * 254.97, so the magnitudes do not vary.
        let frame = frame_from_gray(16, 16, |x, y| if (x + y) % 2 == 0 { 255 } else { 0 });
        let verdict = BlurAnalyzer::default().analyze(&frame);
        assert!((verdict.mean - 4.0 * 255.0 * 0.9999).abs() < 1e-6);
        assert!(verdict.variance < 1e-6);
        assert!(verdict.is_blurred);
    }

    #[test]
    fn test_low_contrast_pixel_checkerboard_is_blurred() {
        // Signed responses alternate around +/-12 (variance ~144); their magnitudes are flat.
        let frame = frame_from_gray(32, 32, |x, y| if (x + y) % 2 == 0 { 3 } else { 0 });
        let verdict = BlurAnalyzer::default().analyze(&frame);
        assert!((verdict.mean - 12.0 * 0.9999).abs() < 1e-6);
        assert!(verdict.variance < 1e-6);
        assert!(verdict.is_blurred);
    }

    #[test]
    fn test_block_checkerboard_is_sharp() {
        let frame = frame_from_gray(64, 64, |x, y| if ((x / 4) + (y / 4)) % 2 == 0 { 255 } else { 0 });
        let verdict = BlurAnalyzer::default().analyze(&frame);
        assert!(!verdict.is_blurred);
        assert!(verdict.variance > 1_000.0);
        assert_eq!(verdict.sharpness(), Sharpness::Sharp);
    }

    #[test]
    fn test_rgba_frames_use_rgb_only() {
        let mut data = Vec::new();
        for _ in 0..16 {
            data.extend_from_slice(&[10, 10, 10, 255]);
        }
        let frame = PixelFrame::from_rgba(4, 4, data).unwrap();
        assert!(BlurAnalyzer::default().analyze(&frame).is_blurred);
    }
}
