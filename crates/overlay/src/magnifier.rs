//! Magnifier geometry
//!
//! All coordinates are monitor-local pixels.

use capture::{Point, Rect};
use std::ops::RangeInclusive;

/// Gap between the magnifier box and the color panel
pub const PANEL_GAP: i32 = 5;
pub const PANEL_HEIGHT: u32 = 50;
pub const SWATCH_SIZE: u32 = 30;
pub const SWATCH_PADDING: i32 = 10;

/// Fixed magnifier parameters for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnifierConfig {
    /// Integer scale applied to the captured patch
    pub zoom_factor: u32,
    /// Side length of the magnifier box
    pub box_size: u32,
    /// Distance from the cursor to the box on both axes
    pub offset: i32,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 12,
            box_size: 150,
            offset: 20,
        }
    }
}

impl MagnifierConfig {
    pub const ZOOM_RANGE: RangeInclusive<u32> = 1..=64;
    pub const BOX_SIZE_RANGE: RangeInclusive<u32> = 16..=1024;
    pub const OFFSET_RANGE: RangeInclusive<i32> = 0..=512;

    /// Pull every field into its range, keeping pixel math in `i32`
    pub fn clamped(self) -> Self {
        Self {
            zoom_factor: self
                .zoom_factor
                .clamp(*Self::ZOOM_RANGE.start(), *Self::ZOOM_RANGE.end()),
            box_size: self
                .box_size
                .clamp(*Self::BOX_SIZE_RANGE.start(), *Self::BOX_SIZE_RANGE.end()),
            offset: self
                .offset
                .clamp(*Self::OFFSET_RANGE.start(), *Self::OFFSET_RANGE.end()),
        }
    }

    fn zoom(&self) -> u32 {
        self.zoom_factor.max(1)
    }

    /// Side of the captured patch in source pixels. Always odd and at least
    /// 3, so there is a real center pixel under the cursor.
    pub fn capture_pixels(&self) -> u32 {
        let mut pixels = (self.box_size / self.zoom()).max(3);
        if pixels % 2 == 0 {
            pixels -= 1;
        }
        pixels
    }

    /// Patch around the cursor, clipped to `bounds`
    pub fn source_region(&self, cursor: Point, bounds: Rect) -> Rect {
        let pixels = self.capture_pixels();
        let radius = (pixels / 2) as i32;
        Rect::new(cursor.x - radius, cursor.y - radius, pixels, pixels).intersection(&bounds)
    }

    /// Top-left of the magnifier box. The box sits below-right of the cursor
    /// and flips to the other side on any axis where it would run past the
    /// area's right or bottom edge.
    pub fn box_origin(&self, cursor: Point, area_width: u32, area_height: u32) -> Point {
        let size = self.box_size as i32;
        let mut origin = Point::new(cursor.x + self.offset, cursor.y + self.offset);
        if origin.x + size > area_width as i32 {
            origin.x = cursor.x - size - self.offset;
        }
        if origin.y + size > area_height as i32 {
            origin.y = cursor.y - size - self.offset;
        }
        origin
    }

    /// Full layout for a cursor on an area of `bounds`, or `None` when the
    /// clipped source region is empty.
    pub fn layout(&self, cursor: Point, bounds: Rect) -> Option<MagnifierLayout> {
        let source = self.source_region(cursor, bounds);
        if source.is_empty() {
            return None;
        }

        let zoom = self.zoom();
        let box_size = self.box_size;
        let box_origin = self.box_origin(cursor, bounds.width, bounds.height);

        // Zoomed patch centered in the box
        let patch_width = source.width * zoom;
        let patch_height = source.height * zoom;
        let patch_origin = Point::new(
            box_origin.x + (box_size as i32 - patch_width as i32) / 2,
            box_origin.y + (box_size as i32 - patch_height as i32) / 2,
        );

        let in_source = cursor - source.top_left();
        let highlight = Rect::new(
            patch_origin.x + in_source.x * zoom as i32,
            patch_origin.y + in_source.y * zoom as i32,
            zoom,
            zoom,
        );

        let panel = Rect::new(
            box_origin.x,
            box_origin.y + box_size as i32 + PANEL_GAP,
            box_size,
            PANEL_HEIGHT,
        );
        let swatch = Rect::new(
            panel.x + SWATCH_PADDING,
            panel.y + (PANEL_HEIGHT as i32 - SWATCH_SIZE as i32) / 2,
            SWATCH_SIZE,
            SWATCH_SIZE,
        );
        let label_x = swatch.right() + SWATCH_PADDING;
        let label = Rect::new(
            label_x,
            panel.y,
            (panel.right() - label_x - SWATCH_PADDING).max(0) as u32,
            PANEL_HEIGHT,
        );

        Some(MagnifierLayout {
            source,
            box_origin,
            patch: Rect::new(patch_origin.x, patch_origin.y, patch_width, patch_height),
            highlight,
            panel,
            swatch,
            label,
        })
    }
}

/// Where each magnifier element goes for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnifierLayout {
    /// Source pixels, inside the screenshot bounds
    pub source: Rect,
    pub box_origin: Point,
    /// Destination of the zoomed patch
    pub patch: Rect,
    /// The zoomed pixel under the cursor
    pub highlight: Rect,
    pub panel: Rect,
    pub swatch: Rect,
    pub label: Rect,
}
