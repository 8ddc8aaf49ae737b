//! Per-monitor screenshots cut from one virtual-desktop capture

use crate::frame::Frame;
use crate::text::TextPainter;
use capture::{virtual_desktop_rect, DesktopFrame, MonitorDescriptor, Point, Rect};
use color::Rgba;
use image::{imageops, RgbaImage};

/// Fill used for monitors without capture data
pub const FALLBACK_BACKGROUND: Rgba = Rgba::opaque(60, 60, 60);

/// Text drawn on fallback screenshots
pub const PLACEHOLDER_LINES: [&str; 2] = ["Screenshot not available", "Please install 'spectacle'"];

const PLACEHOLDER_FONT_SIZE: f32 = 24.0;

/// Immutable screenshot of a single monitor.
///
/// Its dimensions always equal the monitor's size.
#[derive(Debug, Clone)]
pub struct Screenshot {
    monitor: MonitorDescriptor,
    image: RgbaImage,
    placeholder: bool,
}

impl Screenshot {
    pub fn monitor(&self) -> &MonitorDescriptor {
        &self.monitor
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Local bounds, `(0, 0, width, height)`
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// True when this is a synthesized fallback rather than capture data
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Color at a monitor-local point
    pub fn color_at(&self, local: Point) -> Option<Rgba> {
        if !self.bounds().contains_point(local) {
            return None;
        }
        Some(Rgba::from(self.image.get_pixel(local.x as u32, local.y as u32).0))
    }

    /// Convert screen coordinates to screenshot coordinates
    pub fn screen_to_local(&self, global: Point) -> Point {
        self.monitor.to_local(global)
    }

    /// Convert screenshot coordinates to screen coordinates
    pub fn local_to_screen(&self, local: Point) -> Point {
        self.monitor.to_global(local)
    }
}

/// Cuts a full-desktop capture into one [`Screenshot`] per monitor.
pub struct ScreenshotCompositor<'a> {
    text: &'a mut TextPainter,
}

impl<'a> ScreenshotCompositor<'a> {
    pub fn new(text: &'a mut TextPainter) -> Self {
        Self { text }
    }

    /// Produce a screenshot for every monitor, in monitor order.
    ///
    /// Monitors whose area is missing from `full` (or all monitors, when
    /// `full` is `None`) get a labeled placeholder instead.
    pub fn composite(
        &mut self,
        full: Option<&DesktopFrame>,
        monitors: &[MonitorDescriptor],
    ) -> Vec<Screenshot> {
        let Some(desktop) = virtual_desktop_rect(monitors) else {
            return Vec::new();
        };

        monitors
            .iter()
            .map(|monitor| {
                let offset = monitor.rect.top_left() - desktop.top_left();
                let region = Rect::new(offset.x, offset.y, monitor.rect.width, monitor.rect.height);

                match full.and_then(|frame| frame.crop(&region)) {
                    Some(part) => Screenshot {
                        monitor: monitor.clone(),
                        image: pad_to(part, monitor.rect.width, monitor.rect.height),
                        placeholder: false,
                    },
                    None => {
                        tracing::debug!(monitor = monitor.id, "using placeholder screenshot");
                        Screenshot {
                            monitor: monitor.clone(),
                            image: self.placeholder(monitor.rect.width, monitor.rect.height),
                            placeholder: true,
                        }
                    }
                }
            })
            .collect()
    }

    fn placeholder(&mut self, width: u32, height: u32) -> RgbaImage {
        let background = FALLBACK_BACKGROUND.to_argb_u32();
        let mut buffer = vec![background; width as usize * height as usize];
        {
            let mut frame = Frame::new(&mut buffer, width as usize, height as usize);
            self.text.draw_centered(
                &mut frame,
                Rect::new(0, 0, width, height),
                &PLACEHOLDER_LINES,
                PLACEHOLDER_FONT_SIZE,
                0xFFFFFFFF,
            );
        }

        RgbaImage::from_fn(width, height, |x, y| {
            let argb = buffer[(y * width + x) as usize];
            image::Rgba([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, 255])
        })
    }
}

/// Grow a clipped crop back to the monitor size. The uncovered area gets
/// the fallback background.
fn pad_to(part: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if part.dimensions() == (width, height) {
        return part;
    }
    let bg = FALLBACK_BACKGROUND;
    let mut full = RgbaImage::from_pixel(width, height, image::Rgba([bg.r, bg.g, bg.b, bg.a]));
    imageops::replace(&mut full, &part, 0, 0);
    full
}
