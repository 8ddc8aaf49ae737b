//! Shared test doubles for overlay integration tests

#![allow(dead_code)]

use capture::{CaptureError, CaptureResult, CaptureSource, DesktopFrame, MonitorDescriptor, Rect};
use color::ColorFormat;
use image::RgbaImage;
use overlay::{
    ClipboardSink, Collaborators, FormatStore, Notifier, OverlayConfig, SessionCoordinator,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Deterministic desktop content, distinct per pixel over small areas
pub fn pixel(x: u32, y: u32) -> image::Rgba<u8> {
    image::Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + 2 * y) % 256) as u8, 255])
}

pub fn desktop(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, pixel)
}

/// Two monitors side by side, the second one shorter and offset down
pub fn dual_monitors() -> Vec<MonitorDescriptor> {
    vec![
        MonitorDescriptor::new(0, "DP-1", Rect::new(0, 0, 64, 48)),
        MonitorDescriptor::new(1, "HDMI-1", Rect::new(64, 16, 32, 32)),
    ]
}

pub struct FakeCapture {
    image: Option<RgbaImage>,
    calls: Rc<Cell<usize>>,
}

impl CaptureSource for FakeCapture {
    fn capture_desktop(&mut self) -> CaptureResult<DesktopFrame> {
        self.calls.set(self.calls.get() + 1);
        match &self.image {
            Some(image) => DesktopFrame::from_image(image.clone()),
            None => Err(CaptureError::Timeout(2000)),
        }
    }
}

pub struct RecordingClipboard(Rc<RefCell<Vec<String>>>);

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.0.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub struct FailingClipboard;

impl ClipboardSink for FailingClipboard {
    fn set_text(&mut self, _text: &str) -> anyhow::Result<()> {
        anyhow::bail!("clipboard unavailable")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub duration: Duration,
}

pub struct RecordingNotifier(Rc<RefCell<Vec<Notification>>>);

impl Notifier for RecordingNotifier {
    fn notify(&mut self, title: &str, body: &str, duration: Duration) -> anyhow::Result<()> {
        self.0.borrow_mut().push(Notification {
            title: title.to_string(),
            body: body.to_string(),
            duration,
        });
        Ok(())
    }
}

pub struct MemoryStore {
    current: ColorFormat,
    saved: Rc<RefCell<Vec<ColorFormat>>>,
}

impl FormatStore for MemoryStore {
    fn load_format(&self) -> ColorFormat {
        self.current
    }

    fn save_format(&mut self, format: ColorFormat) -> anyhow::Result<()> {
        self.current = format;
        self.saved.borrow_mut().push(format);
        Ok(())
    }
}

/// A coordinator wired to recording doubles
pub struct Harness {
    pub coordinator: SessionCoordinator,
    pub captures: Rc<Cell<usize>>,
    pub clipboard: Rc<RefCell<Vec<String>>>,
    pub notifications: Rc<RefCell<Vec<Notification>>>,
    pub saved_formats: Rc<RefCell<Vec<ColorFormat>>>,
}

impl Harness {
    pub fn new(image: Option<RgbaImage>, format: ColorFormat) -> Self {
        let clipboard = Rc::new(RefCell::new(Vec::new()));
        let sink = Box::new(RecordingClipboard(clipboard.clone()));
        Self::build(image, format, clipboard, sink)
    }

    /// Harness whose clipboard always fails
    pub fn failing_clipboard(image: Option<RgbaImage>, format: ColorFormat) -> Self {
        Self::build(image, format, Rc::new(RefCell::new(Vec::new())), Box::new(FailingClipboard))
    }

    fn build(
        image: Option<RgbaImage>,
        format: ColorFormat,
        clipboard: Rc<RefCell<Vec<String>>>,
        sink: Box<dyn ClipboardSink>,
    ) -> Self {
        let captures = Rc::new(Cell::new(0));
        let notifications = Rc::new(RefCell::new(Vec::new()));
        let saved_formats = Rc::new(RefCell::new(Vec::new()));

        let collaborators = Collaborators {
            capture: Box::new(FakeCapture {
                image,
                calls: captures.clone(),
            }),
            clipboard: sink,
            notifier: Box::new(RecordingNotifier(notifications.clone())),
            store: Box::new(MemoryStore {
                current: format,
                saved: saved_formats.clone(),
            }),
        };

        Self {
            coordinator: SessionCoordinator::new(OverlayConfig::default(), collaborators),
            captures,
            clipboard,
            notifications,
            saved_formats,
        }
    }

    /// Harness over a 96x48 desktop matching [`dual_monitors`]
    pub fn dual(format: ColorFormat) -> Self {
        Self::new(Some(desktop(96, 48)), format)
    }
}
