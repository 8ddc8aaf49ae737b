//! Frame buffer drawing primitives
//!
//! Pixels are `0xAARRGGBB`; the alpha byte of the buffer itself is ignored
//! by the presenter. Every operation clips against the frame bounds, so
//! callers may pass rectangles that hang off any edge.

use capture::Rect;
use image::RgbaImage;

/// Blend `fg` over `bg` with the given coverage. Result is opaque.
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let mix = |shift: u32| {
        let b = ((bg >> shift) & 0xFF) as f32;
        let f = ((fg >> shift) & 0xFF) as f32;
        ((b * (1.0 - alpha) + f * alpha).round() as u32).min(255)
    };

    0xFF000000 | (mix(16) << 16) | (mix(8) << 8) | mix(0)
}

/// Pack an RGBA pixel as opaque ARGB
#[inline]
pub fn argb_from_rgba(p: [u8; 4]) -> u32 {
    0xFF000000 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32
}

/// A frame buffer wrapper providing safe drawing primitives.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Frame<'a> {
    /// Create a new frame from a mutable pixel buffer.
    ///
    /// If the buffer is smaller than width*height, the height is reduced
    /// to fit.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let height = if width == 0 {
            0
        } else {
            height.min(buffer.len() / width)
        };

        Self {
            buffer,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Clip `rect` to the frame, as `(x0, y0, x1, y1)` with exclusive ends
    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let bounds = Rect::new(0, 0, self.width as u32, self.height as u32);
        let visible = bounds.intersection(&rect);
        if visible.is_empty() {
            return None;
        }
        Some((
            visible.x as usize,
            visible.y as usize,
            visible.right() as usize,
            visible.bottom() as usize,
        ))
    }

    /// Get a single pixel (returns 0 if out of bounds)
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x]
        } else {
            0
        }
    }

    /// Set a single pixel (bounds-checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }

    /// Blend a pixel with the given coverage (bounds-checked)
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let idx = y as usize * self.width + x as usize;
            self.buffer[idx] = if alpha >= 1.0 {
                color | 0xFF000000
            } else {
                blend_colors(self.buffer[idx], color, alpha)
            };
        }
    }

    /// Fill a rectangle with a solid color (no alpha blending)
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = y * self.width;
            self.buffer[row + x0..row + x1].fill(color);
        }
    }

    /// Fill a rectangle, blending by the color's alpha byte
    pub fn blend_rect(&mut self, rect: Rect, color: u32) {
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        if alpha >= 1.0 {
            return self.fill_rect(rect, color);
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = y * self.width;
            for px in &mut self.buffer[row + x0..row + x1] {
                *px = blend_colors(*px, color, alpha);
            }
        }
    }

    /// Outline a rectangle. The border is drawn inside `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: u32, color: u32) {
        let t = thickness.min(rect.width).min(rect.height);
        if t == 0 {
            return;
        }
        let ti = t as i32;
        // Top, bottom, left, right
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - ti, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.height), color);
        self.fill_rect(Rect::new(rect.right() - ti, rect.y, t, rect.height), color);
    }

    /// Copy an image 1:1 with its top-left at `(x, y)`
    pub fn blit_image(&mut self, image: &RgbaImage, x: i32, y: i32) {
        self.blit_scaled_nearest(image, x, y, 1);
    }

    /// Copy an image enlarged by an integer factor, replicating each source
    /// pixel into a `factor x factor` block without blending.
    pub fn blit_scaled_nearest(&mut self, image: &RgbaImage, x: i32, y: i32, factor: u32) {
        let factor = factor.max(1);
        let dest = Rect::new(x, y, image.width() * factor, image.height() * factor);
        let Some((x0, y0, x1, y1)) = self.clip(dest) else {
            return;
        };

        for py in y0..y1 {
            let src_y = (py as i32 - y) as u32 / factor;
            let row = py * self.width;
            for px in x0..x1 {
                let src_x = (px as i32 - x) as u32 / factor;
                self.buffer[row + px] = argb_from_rgba(image.get_pixel(src_x, src_y).0);
            }
        }
    }
}
