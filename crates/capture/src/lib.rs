//! Desktop capture module for ColorPick
//!
//! Provides monitor geometry and full virtual-desktop capture through an
//! external screenshot tool.

pub mod capture;
pub mod frame;

pub use capture::{CaptureSource, ExternalCapture, OUTPUT_PLACEHOLDER};
pub use frame::DesktopFrame;

use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to launch capture tool '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Capture tool timed out after {0} ms")]
    Timeout(u64),

    #[error("Capture tool exited with {0}")]
    ToolFailed(ExitStatus),

    #[error("Capture produced an empty image")]
    EmptyCapture,
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Point in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rectangle in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping area, or an empty rect when disjoint
    pub fn intersection(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::default();
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }
}

/// Monitor identity and placement on the virtual desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorDescriptor {
    pub id: u32,
    pub name: String,
    pub rect: Rect,
}

impl MonitorDescriptor {
    pub fn new(id: u32, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            rect,
        }
    }

    /// Convert virtual-desktop coordinates to monitor-local coordinates
    pub fn to_local(&self, global: Point) -> Point {
        global - self.rect.top_left()
    }

    /// Convert monitor-local coordinates to virtual-desktop coordinates
    pub fn to_global(&self, local: Point) -> Point {
        local + self.rect.top_left()
    }
}

/// Union of all monitor rectangles. `None` when there are no monitors.
pub fn virtual_desktop_rect(monitors: &[MonitorDescriptor]) -> Option<Rect> {
    let mut iter = monitors.iter();
    let first = iter.next()?.rect;
    Some(iter.fold(first, |acc, m| acc.union(&m.rect)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -3, 10, 6);
        assert_eq!(a.intersection(&b), Rect::new(5, 0, 5, 3));
        assert!(a.intersection(&Rect::new(10, 0, 5, 5)).is_empty());
    }

    #[test]
    fn virtual_desktop_spans_negative_origins() {
        let monitors = vec![
            MonitorDescriptor::new(0, "primary", Rect::new(0, 0, 1920, 1080)),
            MonitorDescriptor::new(1, "left", Rect::new(-1280, 200, 1280, 1024)),
        ];
        assert_eq!(
            virtual_desktop_rect(&monitors),
            Some(Rect::new(-1280, 0, 3200, 1224))
        );
        assert_eq!(virtual_desktop_rect(&[]), None);
    }

    #[test]
    fn local_global_conversion() {
        let m = MonitorDescriptor::new(3, "right", Rect::new(1920, -100, 800, 600));
        let local = m.to_local(Point::new(2000, 0));
        assert_eq!(local, Point::new(80, 100));
        assert_eq!(m.to_global(local), Point::new(2000, 0));
    }
}
