//! Glyph rendering with fontdue

use crate::frame::Frame;
use capture::Rect;
use fontdue::{Font, FontSettings, Metrics};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// Fonts tried when no explicit font is configured
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

fn load_font_file(path: &Path) -> Option<Font> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Font {} not readable: {}", path.display(), e);
            return None;
        }
    };
    match Font::from_bytes(bytes, FontSettings::default()) {
        Ok(font) => Some(font),
        Err(e) => {
            tracing::warn!("Failed to parse font {}: {}", path.display(), e);
            None
        }
    }
}

/// Load the overlay font: the explicit path if given, otherwise the first
/// usable system font. Without a font, text is simply not drawn.
pub fn load_font(explicit: Option<&Path>) -> Option<Font> {
    if let Some(path) = explicit {
        if let Some(font) = load_font_file(path) {
            tracing::debug!("Loaded font {}", path.display());
            return Some(font);
        }
        tracing::warn!("Configured font {} unusable, trying system fonts", path.display());
    }

    let font = SYSTEM_FONT_PATHS
        .iter()
        .map(Path::new)
        .filter(|p| p.exists())
        .find_map(load_font_file);
    if font.is_none() {
        tracing::warn!("No usable font found; overlay text will not be drawn");
    }
    font
}

// Glyph cache key: (character, font_size as bits)
type GlyphCache = HashMap<(char, u32), (Metrics, Vec<u8>)>;

/// Text rendering context wrapping an optional font and a glyph cache.
pub struct TextPainter {
    font: Option<Rc<Font>>,
    glyph_cache: GlyphCache,
}

impl TextPainter {
    pub fn new(font: Option<Rc<Font>>) -> Self {
        Self {
            font,
            glyph_cache: HashMap::new(),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// (ascent, line height) in pixels
    fn line_metrics(&self, size: f32) -> (f32, f32) {
        self.font
            .as_ref()
            .and_then(|f| f.horizontal_line_metrics(size))
            .map(|m| (m.ascent, m.new_line_size))
            .unwrap_or((size * 0.8, size * 1.2))
    }

    fn glyph(&mut self, font: &Font, ch: char, size: f32) -> &(Metrics, Vec<u8>) {
        self.glyph_cache
            .entry((ch, size.to_bits()))
            .or_insert_with(|| font.rasterize(ch, size))
    }

    /// Measure text width in pixels
    pub fn measure(&mut self, text: &str, size: f32) -> f32 {
        let Some(font) = self.font.clone() else {
            return 0.0;
        };
        text.chars()
            .map(|ch| self.glyph(&font, ch, size).0.advance_width)
            .sum()
    }

    /// Draw one line of text with its top edge at `y`
    pub fn draw(&mut self, frame: &mut Frame, x: i32, y: i32, text: &str, size: f32, color: u32) {
        let Some(font) = self.font.clone() else {
            return;
        };
        let (ascent, _) = self.line_metrics(size);
        let baseline = y as f32 + ascent;
        let mut pen_x = x as f32;

        for ch in text.chars() {
            let (metrics, bitmap) = self.glyph(&font, ch, size);
            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let px = pen_x as i32 + gx as i32 + metrics.xmin;
                    let py = (glyph_top + gy as f32) as i32;
                    frame.blend_pixel(px, py, color, coverage as f32 / 255.0);
                }
            }

            pen_x += metrics.advance_width;
        }
    }

    /// Draw text left-aligned and vertically centered in `rect`
    pub fn draw_left_centered(
        &mut self,
        frame: &mut Frame,
        rect: Rect,
        text: &str,
        size: f32,
        color: u32,
    ) {
        let (_, line_height) = self.line_metrics(size);
        let y = rect.y + ((rect.height as f32 - line_height) / 2.0).round() as i32;
        self.draw(frame, rect.x, y, text, size, color);
    }

    /// Draw lines centered horizontally and vertically in `rect`
    pub fn draw_centered(
        &mut self,
        frame: &mut Frame,
        rect: Rect,
        lines: &[&str],
        size: f32,
        color: u32,
    ) {
        let (_, line_height) = self.line_metrics(size);
        let block = line_height * lines.len() as f32;
        let mut y = rect.y as f32 + (rect.height as f32 - block) / 2.0;

        for line in lines {
            let width = self.measure(line, size);
            let x = rect.x as f32 + (rect.width as f32 - width) / 2.0;
            self.draw(frame, x.round() as i32, y.round() as i32, line, size, color);
            y += line_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_font_nothing_is_drawn() {
        let mut painter = TextPainter::new(None);
        let mut buffer = vec![0u32; 50 * 20];
        let mut frame = Frame::new(&mut buffer, 50, 20);

        painter.draw(&mut frame, 0, 0, "FF0080", 14.0, 0xFFFFFFFF);
        painter.draw_centered(&mut frame, Rect::new(0, 0, 50, 20), &["a", "b"], 14.0, 0xFFFFFFFF);

        assert!(!painter.has_font());
        assert_eq!(painter.measure("FF0080", 14.0), 0.0);
        assert!(buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn missing_explicit_font_falls_back() {
        // Must not panic whether or not a system font is installed
        let _ = load_font(Some(Path::new("/definitely/not/a/font.ttf")));
    }
}
