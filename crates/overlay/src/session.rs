//! Per-monitor overlay session
//!
//! A session owns its screenshot and renderer. It does not own a window:
//! the host feeds it cursor ticks and input and gives it a frame to draw
//! into. Terminal outcomes are reported over the coordinator's channel.

use crate::frame::Frame;
use crate::render::MagnifierRenderer;
use crate::screenshot::Screenshot;
use crate::PickOutcome;
use capture::Point;
use color::{format_color, ColorFormat};
use crossbeam_channel::Sender;

/// Lifecycle of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Armed,
    Picked,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Picked | SessionState::Cancelled)
    }
}

/// User input delivered to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayInput {
    /// Primary button press at a monitor-local position
    Primary(Point),
    /// Secondary button press, anywhere
    Secondary,
    /// Cancel key
    CancelKey,
}

/// Terminal event sent from a session to its coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub monitor: u32,
    pub outcome: PickOutcome,
}

pub struct OverlaySession {
    screenshot: Screenshot,
    renderer: MagnifierRenderer,
    format: ColorFormat,
    state: SessionState,
    /// Last monitor-local cursor, `None` while the cursor is elsewhere
    cursor: Option<Point>,
    /// Set until the first frame has been drawn
    needs_redraw: bool,
    events: Sender<SessionEvent>,
}

impl OverlaySession {
    pub fn new(
        screenshot: Screenshot,
        renderer: MagnifierRenderer,
        format: ColorFormat,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self {
            screenshot,
            renderer,
            format,
            state: SessionState::Idle,
            cursor: None,
            needs_redraw: false,
            events,
        }
    }

    pub fn monitor_id(&self) -> u32 {
        self.screenshot.monitor().id
    }

    pub fn screenshot(&self) -> &Screenshot {
        &self.screenshot
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Local cursor while it is on this monitor
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn is_armed(&self) -> bool {
        self.state == SessionState::Armed
    }

    /// Start accepting ticks and input. Only valid from `Idle`.
    pub fn arm(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Armed;
            self.needs_redraw = true;
        }
    }

    /// Feed the global cursor position. Returns true when the session needs
    /// to be redrawn.
    pub fn tick(&mut self, global: Option<Point>) -> bool {
        if !self.is_armed() {
            return false;
        }

        let local = global
            .map(|p| self.screenshot.screen_to_local(p))
            .filter(|p| self.screenshot.bounds().contains_point(*p));

        let moved = local != self.cursor;
        self.cursor = local;
        moved | std::mem::take(&mut self.needs_redraw)
    }

    /// Draw the current state into `frame`
    pub fn render(&mut self, frame: &mut Frame) {
        self.needs_redraw = false;
        self.renderer.render(frame, &self.screenshot, self.cursor);
    }

    /// Apply user input. Returns the outcome if the session terminated.
    pub fn handle_input(&mut self, input: OverlayInput) -> Option<PickOutcome> {
        if !self.is_armed() {
            return None;
        }

        let outcome = match input {
            OverlayInput::Primary(local) => match self.screenshot.color_at(local) {
                Some(color) => PickOutcome::Picked(format_color(color, self.format)),
                None => {
                    tracing::debug!(
                        monitor = self.monitor_id(),
                        ?local,
                        "press outside screenshot"
                    );
                    PickOutcome::Cancelled
                }
            },
            OverlayInput::Secondary | OverlayInput::CancelKey => PickOutcome::Cancelled,
        };

        self.state = match outcome {
            PickOutcome::Picked(_) => SessionState::Picked,
            PickOutcome::Cancelled => SessionState::Cancelled,
        };

        let event = SessionEvent {
            monitor: self.monitor_id(),
            outcome: outcome.clone(),
        };
        if self.events.send(event).is_err() {
            tracing::debug!(monitor = self.monitor_id(), "coordinator gone, event dropped");
        }
        Some(outcome)
    }

    /// Terminate without reporting an event
    pub fn force_cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnifier::MagnifierConfig;
    use crate::screenshot::ScreenshotCompositor;
    use crate::text::TextPainter;
    use capture::{DesktopFrame, MonitorDescriptor, Rect};
    use crossbeam_channel::{unbounded, Receiver};
    use image::RgbaImage;

    fn session(format: ColorFormat) -> (OverlaySession, Receiver<SessionEvent>) {
        let image = RgbaImage::from_fn(40, 20, |x, y| {
            image::Rgba([x as u8 * 5, y as u8 * 10, 128, 255])
        });
        let full = DesktopFrame::from_image(image).unwrap();
        let monitors = [
            MonitorDescriptor::new(1, "left", Rect::new(0, 0, 20, 20)),
            MonitorDescriptor::new(2, "right", Rect::new(20, 0, 20, 20)),
        ];
        let mut text = TextPainter::new(None);
        let shot = ScreenshotCompositor::new(&mut text)
            .composite(Some(&full), &monitors)
            .remove(1);

        let (tx, rx) = unbounded();
        let renderer =
            MagnifierRenderer::new(MagnifierConfig::default(), format, TextPainter::new(None));
        (OverlaySession::new(shot, renderer, format, tx), rx)
    }

    #[test]
    fn idle_ignores_ticks_and_input() {
        let (mut s, rx) = session(ColorFormat::Html);
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.tick(Some(Point::new(25, 5))));
        assert_eq!(s.handle_input(OverlayInput::CancelKey), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn first_tick_after_arm_redraws() {
        let (mut s, _rx) = session(ColorFormat::Html);
        s.arm();
        assert!(s.tick(None));
        assert!(!s.tick(None));
    }

    #[test]
    fn redraws_only_when_cursor_moves() {
        let (mut s, _rx) = session(ColorFormat::Html);
        s.arm();
        assert!(s.tick(Some(Point::new(25, 5))));
        assert_eq!(s.cursor(), Some(Point::new(5, 5)));
        assert!(!s.tick(Some(Point::new(25, 5))));
        assert!(s.tick(Some(Point::new(26, 5))));
    }

    #[test]
    fn leaving_monitor_hides_once() {
        let (mut s, _rx) = session(ColorFormat::Html);
        s.arm();
        s.tick(Some(Point::new(25, 5)));

        // Cursor moves onto the left monitor
        assert!(s.tick(Some(Point::new(5, 5))));
        assert_eq!(s.cursor(), None);
        assert!(!s.tick(Some(Point::new(6, 5))));
        assert!(!s.tick(None));

        assert!(s.tick(Some(Point::new(39, 19))));
        assert_eq!(s.cursor(), Some(Point::new(19, 19)));
    }

    #[test]
    fn primary_inside_picks_screenshot_pixel() {
        let (mut s, rx) = session(ColorFormat::Rgb);
        s.arm();

        let outcome = s.handle_input(OverlayInput::Primary(Point::new(3, 4)));
        // Right monitor starts at x=20 in the capture
        let expected = PickOutcome::Picked("rgb(115, 40, 128)".to_string());
        assert_eq!(outcome, Some(expected.clone()));
        assert_eq!(s.state(), SessionState::Picked);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent {
                monitor: 2,
                outcome: expected
            }
        );
    }

    #[test]
    fn primary_outside_cancels() {
        let (mut s, rx) = session(ColorFormat::Html);
        s.arm();
        assert_eq!(
            s.handle_input(OverlayInput::Primary(Point::new(20, 0))),
            Some(PickOutcome::Cancelled)
        );
        assert_eq!(s.state(), SessionState::Cancelled);
        assert_eq!(rx.try_recv().unwrap().outcome, PickOutcome::Cancelled);
    }

    #[test]
    fn secondary_and_cancel_key_cancel() {
        for input in [OverlayInput::Secondary, OverlayInput::CancelKey] {
            let (mut s, _rx) = session(ColorFormat::Html);
            s.arm();
            assert_eq!(s.handle_input(input), Some(PickOutcome::Cancelled));
        }
    }

    #[test]
    fn terminal_state_is_final() {
        let (mut s, rx) = session(ColorFormat::Html);
        s.arm();
        s.handle_input(OverlayInput::Secondary);
        let _ = rx.try_recv();

        assert_eq!(s.handle_input(OverlayInput::Primary(Point::new(1, 1))), None);
        assert!(!s.tick(Some(Point::new(25, 5))));
        s.force_cancel();
        assert_eq!(s.state(), SessionState::Cancelled);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn force_cancel_sends_nothing() {
        let (mut s, rx) = session(ColorFormat::Html);
        s.arm();
        s.force_cancel();
        assert_eq!(s.state(), SessionState::Cancelled);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn render_without_cursor_is_base_image() {
        let (mut s, _rx) = session(ColorFormat::Html);
        s.arm();
        let mut buffer = vec![0u32; 20 * 20];
        let mut frame = Frame::new(&mut buffer, 20, 20);
        s.render(&mut frame);
        assert_eq!(buffer[0], crate::frame::argb_from_rgba([100, 0, 128, 255]));
    }
}
