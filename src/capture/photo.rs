use crate::errors::GateError;
use crate::timing::Timestamp;
use crate::types::{PixelFrame, PixelLayout};
use chrono::{DateTime, Utc};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use uuid::Uuid;

/// Frame committed by a successful capture attempt
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub attempt_id: Uuid,
    pub frame: PixelFrame,
    /// Session time of the tick that accepted the frame
    pub captured_at: Timestamp,
    pub wall_clock: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(attempt_id: Uuid, frame: PixelFrame, captured_at: Timestamp) -> Self {
        Self {
            attempt_id,
            frame,
            captured_at,
            wall_clock: Utc::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Encode the captured frame as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, GateError> {
        let color = match self.frame.layout() {
            PixelLayout::Rgb8 => ExtendedColorType::Rgb8,
            PixelLayout::Rgba8 => ExtendedColorType::Rgba8,
        };

        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(self.frame.data(), self.width(), self.height(), color)
            .map_err(|e| GateError::Encoding(format!("Failed to encode PNG: {}", e)))?;

        log::debug!(
            "Encoded {}x{} capture as PNG ({} bytes)",
            self.width(),
            self.height(),
            out.len()
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_export_round_trips_dimensions() {
        let frame = PixelFrame::from_rgba(4, 2, vec![128u8; 4 * 2 * 4]).unwrap();
        let photo = CapturedPhoto::new(Uuid::new_v4(), frame, Timestamp::from_millis(300));

        let png = photo.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 2);
    }
}
