//! Synthetic frames and sensor samples
//!
//! Deterministic inputs with known brightness, edge content and motion, for
//! exercising the analyzers and a full session without a camera.

use crate::timing::Timestamp;
use crate::types::{MotionSample, PixelFrame, RotationRate, Vec3};

/// Standard gravity, added to the z axis of synthetic acceleration-including-gravity.
const GRAVITY: f64 = 9.81;

/// Frame where every channel of every pixel is `value`.
pub fn uniform_frame(width: u32, height: u32, value: u8) -> PixelFrame {
    let data = vec![value; width as usize * height as usize * 3];
    PixelFrame::rgb_unchecked(width, height, data)
}

/// Gray checkerboard of `cell`-pixel squares alternating between `low` and `high`.
pub fn checkerboard_frame(width: u32, height: u32, cell: u32, low: u8, high: u8) -> PixelFrame {
    let cell = cell.max(1);
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 { high } else { low };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    PixelFrame::rgb_unchecked(width, height, data)
}

/// Bright frame with strong edges: passes both the darkness and the blur check.
pub fn sharp_frame(width: u32, height: u32) -> PixelFrame {
    checkerboard_frame(width, height, 4, 150, 255)
}

/// Single-row frame in which exactly `dark` of the `sampled` pixels visited with
/// `stride` are black; every other pixel is white.
pub fn dark_sample_frame(sampled: usize, dark: usize, stride: usize) -> PixelFrame {
    let stride = stride.max(1);
    let width = sampled * stride;
    let mut data = vec![255u8; width * 3];
    for k in 0..dark.min(sampled) {
        let offset = k * stride * 3;
        data[offset..offset + 3].fill(0);
    }
    PixelFrame::rgb_unchecked(width as u32, 1, data)
}

/// Accelerometer event with linear acceleration of the given magnitude along x.
pub fn motion_sample(timestamp: Timestamp, magnitude: f64) -> MotionSample {
    let acceleration = Vec3::new(magnitude, 0.0, 0.0);
    MotionSample {
        timestamp,
        acceleration,
        acceleration_including_gravity: Vec3::new(magnitude, 0.0, GRAVITY),
        interval_ms: 16.0,
        rotation_rate: Some(RotationRate {
            alpha: magnitude * 10.0,
            beta: 0.0,
            gamma: 0.0,
        }),
    }
}
