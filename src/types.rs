//! Frame and sensor data types shared by the analyzers and the capture session.

use crate::errors::GateError;
use crate::timing::Timestamp;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Channel layout of a frame buffer. Alpha, when present, is ignored by analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelLayout {
    Rgb8,
    Rgba8,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }
}

/// Immutable snapshot of a decoded camera frame.
///
/// Pixel data is reference counted, so cloning a frame (for example to keep it
/// as a capture payload) never copies the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Bytes,
}

impl PixelFrame {
    /// Wrap a row-major buffer. The buffer length must match `width * height * channels`.
    ///
    /// Zero-area frames are accepted; analyzers classify them instead of failing.
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: impl Into<Bytes>,
    ) -> Result<Self, GateError> {
        let data = data.into();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layout.channels()))
            .unwrap_or(usize::MAX);

        if data.len() != expected {
            return Err(GateError::InvalidFrame {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn from_rgb(width: u32, height: u32, data: impl Into<Bytes>) -> Result<Self, GateError> {
        Self::new(width, height, PixelLayout::Rgb8, data)
    }

    pub fn from_rgba(width: u32, height: u32, data: impl Into<Bytes>) -> Result<Self, GateError> {
        Self::new(width, height, PixelLayout::Rgba8, data)
    }

    /// For buffers whose length is correct by construction.
    pub(crate) fn rgb_unchecked(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            layout: PixelLayout::Rgb8,
            data: data.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// RGB channels of the pixel at a row-major index.
    ///
    /// # Panics
    /// Panics if `index >= pixel_count()`.
    #[inline]
    pub fn rgb(&self, index: usize) -> [u8; 3] {
        let offset = index * self.layout.channels();
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    /// RGB channels at column `x`, row `y`.
    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        self.rgb(y as usize * self.width as usize + x as usize)
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(self.layout.channels())
            .map(|px| [px[0], px[1], px[2]])
    }
}

/// Three-axis vector in the sensor's native units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Gyroscope rates around the device z (alpha), x (beta) and y (gamma) axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationRate {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// One accelerometer event as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp: Timestamp,
    /// Linear acceleration with gravity removed.
    pub acceleration: Vec3,
    pub acceleration_including_gravity: Vec3,
    /// Platform-reported interval between events, in milliseconds.
    pub interval_ms: f64,
    /// Absent on devices without a gyroscope.
    pub rotation_rate: Option<RotationRate>,
}

impl MotionSample {
    pub fn new(timestamp: Timestamp, acceleration: Vec3) -> Self {
        Self {
            timestamp,
            acceleration,
            acceleration_including_gravity: acceleration,
            interval_ms: 0.0,
            rotation_rate: None,
        }
    }
}

/// Device orientation event. Each angle may be missing on some platforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub timestamp: Timestamp,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}
