//! Overlay rendering: base screenshot, crosshair and magnifier

use crate::frame::Frame;
use crate::magnifier::{MagnifierConfig, MagnifierLayout};
use crate::screenshot::Screenshot;
use crate::text::TextPainter;
use capture::{Point, Rect};
use color::{format_color, ColorFormat, Rgba};
use image::imageops;

const CROSSHAIR_COLOR: u32 = 0xFFFFFFFF;
const CROSSHAIR_ARM: i32 = 10;
const CROSSHAIR_THICKNESS: u32 = 2;
const HIGHLIGHT_COLOR: u32 = 0xFFFF0000;
const HIGHLIGHT_THICKNESS: u32 = 2;
/// Black at alpha 200
const PANEL_COLOR: u32 = 0xC8000000;
const SWATCH_BORDER_COLOR: u32 = 0xFFFFFFFF;
const SWATCH_BORDER_THICKNESS: u32 = 2;
const LABEL_COLOR: u32 = 0xFFFFFFFF;
const LABEL_FONT_SIZE: f32 = 14.0;

/// Draws one overlay frame from an immutable screenshot
pub struct MagnifierRenderer {
    config: MagnifierConfig,
    format: ColorFormat,
    text: TextPainter,
}

impl MagnifierRenderer {
    pub fn new(config: MagnifierConfig, format: ColorFormat, text: TextPainter) -> Self {
        Self {
            config,
            format,
            text,
        }
    }

    pub fn config(&self) -> &MagnifierConfig {
        &self.config
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Render a full frame. With `cursor` set, the magnifier and crosshair
    /// are drawn over the screenshot; otherwise only the screenshot.
    pub fn render(&mut self, frame: &mut Frame, shot: &Screenshot, cursor: Option<Point>) {
        frame.blit_image(shot.image(), 0, 0);

        if let Some(cursor) = cursor {
            if !self.draw_magnifier(frame, shot, cursor) {
                tracing::trace!(?cursor, "magnifier skipped");
            }
            draw_crosshair(frame, cursor);
        }
    }

    /// Returns false when the source region is empty and nothing was drawn
    fn draw_magnifier(&mut self, frame: &mut Frame, shot: &Screenshot, cursor: Point) -> bool {
        let Some(layout) = self.config.layout(cursor, shot.bounds()) else {
            return false;
        };

        let source = layout.source;
        let patch = imageops::crop_imm(
            shot.image(),
            source.x as u32,
            source.y as u32,
            source.width,
            source.height,
        )
        .to_image();
        frame.blit_scaled_nearest(&patch, layout.patch.x, layout.patch.y, self.config.zoom_factor);
        if shot.bounds().contains_point(cursor) {
            frame.stroke_rect(layout.highlight, HIGHLIGHT_THICKNESS, HIGHLIGHT_COLOR);
        }

        // Sampled from the screenshot, never from the zoomed copy
        if let Some(color) = shot.color_at(cursor) {
            self.draw_panel(frame, &layout, color);
        }
        true
    }

    fn draw_panel(&mut self, frame: &mut Frame, layout: &MagnifierLayout, color: Rgba) {
        frame.blend_rect(layout.panel, PANEL_COLOR);

        frame.fill_rect(layout.swatch, color.to_argb_u32() | 0xFF000000);
        frame.stroke_rect(layout.swatch, SWATCH_BORDER_THICKNESS, SWATCH_BORDER_COLOR);

        let text = format_color(color, self.format);
        self.text
            .draw_left_centered(frame, layout.label, &text, LABEL_FONT_SIZE, LABEL_COLOR);
    }
}

fn draw_crosshair(frame: &mut Frame, cursor: Point) {
    let length = (CROSSHAIR_ARM * 2 + 1) as u32;
    let half = (CROSSHAIR_THICKNESS / 2) as i32;
    frame.fill_rect(
        Rect::new(cursor.x - CROSSHAIR_ARM, cursor.y - half, length, CROSSHAIR_THICKNESS),
        CROSSHAIR_COLOR,
    );
    frame.fill_rect(
        Rect::new(cursor.x - half, cursor.y - CROSSHAIR_ARM, CROSSHAIR_THICKNESS, length),
        CROSSHAIR_COLOR,
    );
}
