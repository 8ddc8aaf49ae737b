//! Pick attempt coordination across all monitors

use crate::frame::Frame;
use crate::render::MagnifierRenderer;
use crate::screenshot::ScreenshotCompositor;
use crate::session::{OverlayInput, OverlaySession, SessionEvent};
use crate::text::TextPainter;
use crate::{OverlayConfig, OverlayError, OverlayResult, PickOutcome};
use capture::{CaptureSource, MonitorDescriptor, Point};
use color::ColorFormat;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::BTreeMap;
use std::time::Duration;

pub const NOTIFICATION_TITLE: &str = "Color Picked!";
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(2000);

/// Receives the picked color text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Shows a transient message to the user
pub trait Notifier {
    fn notify(&mut self, title: &str, body: &str, duration: Duration) -> anyhow::Result<()>;
}

/// Persistent storage of the selected color format
pub trait FormatStore {
    fn load_format(&self) -> ColorFormat;
    fn save_format(&mut self, format: ColorFormat) -> anyhow::Result<()>;
}

/// External services used by the coordinator
pub struct Collaborators {
    pub capture: Box<dyn CaptureSource>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub notifier: Box<dyn Notifier>,
    pub store: Box<dyn FormatStore>,
}

/// Owns every active overlay session and closes them all together.
pub struct SessionCoordinator {
    config: OverlayConfig,
    format: ColorFormat,
    collaborators: Collaborators,
    sessions: BTreeMap<u32, OverlaySession>,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
}

impl SessionCoordinator {
    pub fn new(config: OverlayConfig, collaborators: Collaborators) -> Self {
        let format = collaborators.store.load_format();
        let (events_tx, events_rx) = unbounded();
        Self {
            config,
            format,
            collaborators,
            sessions: BTreeMap::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Change the format used by future pick attempts and persist it.
    /// Sessions already on screen keep the format they were created with.
    pub fn set_format(&mut self, format: ColorFormat) {
        self.format = format;
        if let Err(e) = self.collaborators.store.save_format(format) {
            tracing::warn!("Failed to persist color format {}: {:#}", format.name(), e);
        }
    }

    /// Begin a pick attempt. Any active sessions are closed first.
    ///
    /// Returns the number of sessions created; zero when there are no
    /// monitors.
    pub fn start_pick(&mut self, monitors: &[MonitorDescriptor]) -> usize {
        self.close_all();
        if monitors.is_empty() {
            tracing::warn!("No monitors, pick request ignored");
            return 0;
        }

        let desktop = match self.collaborators.capture.capture_desktop() {
            Ok(frame) => {
                tracing::debug!("Captured desktop {}x{}", frame.width(), frame.height());
                Some(frame)
            }
            Err(e) => {
                tracing::warn!("Screen capture unavailable, using placeholder: {}", e);
                None
            }
        };

        let mut text = self.text_painter();
        let shots = ScreenshotCompositor::new(&mut text).composite(desktop.as_ref(), monitors);

        for shot in shots {
            let renderer =
                MagnifierRenderer::new(self.config.magnifier, self.format, self.text_painter());
            let mut session =
                OverlaySession::new(shot, renderer, self.format, self.events_tx.clone());
            session.arm();
            self.sessions.insert(session.monitor_id(), session);
        }

        tracing::debug!("Pick started on {} monitor(s)", self.sessions.len());
        self.sessions.len()
    }

    fn text_painter(&self) -> TextPainter {
        TextPainter::new(self.config.font.clone())
    }

    /// Destroy every session without producing an outcome
    pub fn close_all(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        for session in self.sessions.values_mut() {
            session.force_cancel();
        }
        self.sessions.clear();
        // Stale events from the closed sessions
        while self.events_rx.try_recv().is_ok() {}
        tracing::debug!("All overlay sessions closed");
    }

    /// Advance every session's tick. Returns the monitors to redraw.
    pub fn tick(&mut self, global_cursor: Option<Point>) -> Vec<u32> {
        self.sessions
            .iter_mut()
            .filter_map(|(id, session)| session.tick(global_cursor).then_some(*id))
            .collect()
    }

    /// Draw the session for `monitor` into `frame`
    pub fn render(&mut self, monitor: u32, frame: &mut Frame) -> OverlayResult<()> {
        let session = self
            .sessions
            .get_mut(&monitor)
            .ok_or(OverlayError::UnknownMonitor(monitor))?;
        session.render(frame);
        Ok(())
    }

    /// Route input to the session on `monitor`. A terminal outcome closes
    /// every session before it is returned.
    pub fn handle_input(
        &mut self,
        monitor: u32,
        input: OverlayInput,
    ) -> OverlayResult<Option<PickOutcome>> {
        let session = self
            .sessions
            .get_mut(&monitor)
            .ok_or(OverlayError::UnknownMonitor(monitor))?;
        if !session.is_armed() {
            return Err(OverlayError::SessionClosed);
        }
        session.handle_input(input);
        Ok(self.process_events())
    }

    /// Handle the first pending terminal event, if any.
    pub fn process_events(&mut self) -> Option<PickOutcome> {
        let event = self.events_rx.try_recv().ok()?;
        tracing::debug!(monitor = event.monitor, "Session terminated: {:?}", event.outcome);
        self.close_all();

        if let PickOutcome::Picked(text) = &event.outcome {
            self.deliver(text);
        }
        Some(event.outcome)
    }

    fn deliver(&mut self, text: &str) {
        match self.collaborators.clipboard.set_text(text) {
            Ok(()) => tracing::info!("Copied {} to clipboard", text),
            Err(e) => tracing::warn!("Failed to copy {} to clipboard: {:#}", text, e),
        }

        let body = format!("Copied to clipboard: {}", text);
        if let Err(e) = self
            .collaborators
            .notifier
            .notify(NOTIFICATION_TITLE, &body, NOTIFICATION_DURATION)
        {
            tracing::warn!("Failed to show notification: {:#}", e);
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn session(&self, monitor: u32) -> Option<&OverlaySession> {
        self.sessions.get(&monitor)
    }

    /// Monitors with an active session, in id order
    pub fn monitors(&self) -> Vec<u32> {
        self.sessions.keys().copied().collect()
    }
}
