//! Screenshot compositing and rendering across monitor layouts

mod common;

use capture::{DesktopFrame, MonitorDescriptor, Point, Rect};
use color::{ColorFormat, Rgba};
use common::desktop;
use image::{imageops, RgbaImage};
use overlay::frame::argb_from_rgba;
use overlay::{Frame, MagnifierConfig, MagnifierRenderer, ScreenshotCompositor, TextPainter};

/// Three monitors with a negative origin and mixed sizes, tiling a
/// 120x70 virtual desktop exactly
fn mixed_layout() -> Vec<MonitorDescriptor> {
    vec![
        MonitorDescriptor::new(0, "left", Rect::new(-40, 10, 40, 60)),
        MonitorDescriptor::new(1, "center", Rect::new(0, 0, 50, 70)),
        MonitorDescriptor::new(2, "right", Rect::new(50, 0, 30, 70)),
    ]
}

#[test]
fn test_reconstruction_reproduces_capture() {
    let monitors = mixed_layout();
    let original = desktop(120, 70);
    let frame = DesktopFrame::from_image(original.clone()).unwrap();

    let mut text = TextPainter::new(None);
    let shots = ScreenshotCompositor::new(&mut text).composite(Some(&frame), &monitors);
    assert_eq!(shots.len(), 3);

    // Left monitor does not cover (0..40, 0..10); seed with the original there
    let mut rebuilt = RgbaImage::new(120, 70);
    imageops::replace(&mut rebuilt, &imageops::crop_imm(&original, 0, 0, 40, 10).to_image(), 0, 0);
    for shot in &shots {
        let origin = shot.monitor().rect.top_left() - Point::new(-40, 0);
        imageops::replace(&mut rebuilt, shot.image(), origin.x as i64, origin.y as i64);
    }

    assert_eq!(rebuilt, original);
}

#[test]
fn test_local_and_screen_coordinates_round_trip() {
    let monitors = mixed_layout();
    let frame = DesktopFrame::from_image(desktop(120, 70)).unwrap();
    let mut text = TextPainter::new(None);
    let shots = ScreenshotCompositor::new(&mut text).composite(Some(&frame), &monitors);

    let left = &shots[0];
    assert_eq!(left.screen_to_local(Point::new(-40, 10)), Point::new(0, 0));
    assert_eq!(left.local_to_screen(Point::new(5, 5)), Point::new(-35, 15));

    // Global (-40, 10) is capture pixel (0, 10)
    assert_eq!(
        left.color_at(Point::new(0, 0)),
        Some(Rgba::from(common::pixel(0, 10).0))
    );
    assert_eq!(
        shots[2].color_at(Point::new(0, 0)),
        Some(Rgba::from(common::pixel(90, 0).0))
    );
}

#[test]
fn test_rendering_never_mutates_screenshot() {
    let monitors = vec![MonitorDescriptor::new(0, "only", Rect::new(0, 0, 200, 160))];
    let frame = DesktopFrame::from_image(desktop(200, 160)).unwrap();
    let mut text = TextPainter::new(None);
    let shot = ScreenshotCompositor::new(&mut text)
        .composite(Some(&frame), &monitors)
        .remove(0);
    let before = shot.image().clone();

    let mut renderer = MagnifierRenderer::new(
        MagnifierConfig::default(),
        ColorFormat::Hsv,
        TextPainter::new(None),
    );
    let mut buffer = vec![0u32; 200 * 160];
    for cursor in [Point::new(0, 0), Point::new(199, 159), Point::new(100, 80), Point::new(-1, 3)] {
        let mut frame = Frame::new(&mut buffer, 200, 160);
        renderer.render(&mut frame, &shot, Some(cursor));
    }

    assert_eq!(shot.image(), &before);
}

#[test]
fn test_corner_cursor_renders_clipped_patch() {
    let monitors = vec![MonitorDescriptor::new(0, "only", Rect::new(0, 0, 300, 300))];
    let frame = DesktopFrame::from_image(desktop(300, 300)).unwrap();
    let mut text = TextPainter::new(None);
    let shot = ScreenshotCompositor::new(&mut text)
        .composite(Some(&frame), &monitors)
        .remove(0);

    let config = MagnifierConfig::default();
    let mut renderer = MagnifierRenderer::new(config, ColorFormat::Html, TextPainter::new(None));
    let mut buffer = vec![0u32; 300 * 300];
    let mut frame = Frame::new(&mut buffer, 300, 300);
    renderer.render(&mut frame, &shot, Some(Point::new(0, 0)));

    // 6x6 source patch zoomed to 72x72 and centered in the box at (20, 20)
    let layout = config.layout(Point::new(0, 0), shot.bounds()).unwrap();
    assert_eq!(layout.source, Rect::new(0, 0, 6, 6));
    assert_eq!(layout.patch, Rect::new(59, 59, 72, 72));

    let sample = |x: i32, y: i32| buffer[(y * 300 + x) as usize];
    assert_eq!(sample(59 + 12 * 3 + 6, 59 + 12 * 2 + 6), argb_from_rgba(common::pixel(3, 2).0));
}
