//! Captured virtual-desktop frame

use crate::{CaptureError, CaptureResult, Rect};
use image::{imageops, RgbaImage};
use std::path::Path;

/// Full virtual-desktop capture. Pixel (0, 0) is the top-left of the
/// union of all monitor rectangles.
#[derive(Debug, Clone)]
pub struct DesktopFrame {
    image: RgbaImage,
}

impl DesktopFrame {
    /// Wrap an image, rejecting zero-sized captures
    pub fn from_image(image: RgbaImage) -> CaptureResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::EmptyCapture);
        }
        Ok(Self { image })
    }

    /// Decode a capture written by the external tool
    pub fn load(path: &Path) -> CaptureResult<Self> {
        let len = std::fs::metadata(path)?.len();
        if len == 0 {
            return Err(CaptureError::EmptyCapture);
        }
        let image = image::open(path)?.to_rgba8();
        Self::from_image(image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Crop frame to rectangle, clamped to the frame bounds.
    ///
    /// Returns `None` when nothing of `rect` lies inside the frame.
    pub fn crop(&self, rect: &Rect) -> Option<RgbaImage> {
        let bounds = Rect::new(0, 0, self.width(), self.height());
        let visible = bounds.intersection(rect);
        if visible.is_empty() {
            return None;
        }

        Some(
            imageops::crop_imm(
                &self.image,
                visible.x as u32,
                visible.y as u32,
                visible.width,
                visible.height,
            )
            .to_image(),
        )
    }
}
