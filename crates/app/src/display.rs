//! winit frontend hosting one overlay window per monitor

use anyhow::Context as _;
use capture::{MonitorDescriptor, Point, Rect};
use overlay::{Frame, OverlayInput, PickOutcome, SessionCoordinator};
use softbuffer::{Context, Surface};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, OwnedDisplayHandle};
use winit::keyboard::{Key, NamedKey};
use winit::monitor::MonitorHandle;
use winit::window::{CursorIcon, Fullscreen, Window, WindowId, WindowLevel};

struct OverlayWindow {
    monitor: MonitorDescriptor,
    window: Rc<Window>,
    surface: Surface<OwnedDisplayHandle, Rc<Window>>,
    /// Last cursor position reported for this window, monitor-local
    cursor: Option<Point>,
}

impl OverlayWindow {
    fn open(
        event_loop: &ActiveEventLoop,
        context: &Context<OwnedDisplayHandle>,
        handle: MonitorHandle,
        monitor: MonitorDescriptor,
    ) -> anyhow::Result<Self> {
        let attributes = Window::default_attributes()
            .with_title("colorpick")
            .with_decorations(false)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_position(handle.position())
            .with_fullscreen(Some(Fullscreen::Borderless(Some(handle))))
            .with_cursor(CursorIcon::Crosshair);

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .with_context(|| format!("Failed to create overlay window on {}", monitor.name))?,
        );
        let surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;

        Ok(Self {
            monitor,
            window,
            surface,
            cursor: None,
        })
    }

    fn present(&mut self, coordinator: &mut SessionCoordinator) -> anyhow::Result<()> {
        let size = self.window.inner_size();
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(());
        };
        self.surface
            .resize(width, height)
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get surface buffer: {}", e))?;
        {
            let mut frame = Frame::new(&mut buffer, size.width as usize, size.height as usize);
            coordinator.render(self.monitor.id, &mut frame)?;
        }
        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }
}

/// Event loop state for one pick attempt
pub struct PickApp {
    coordinator: SessionCoordinator,
    tick_interval: Duration,
    context: Option<Context<OwnedDisplayHandle>>,
    windows: HashMap<WindowId, OverlayWindow>,
    /// Global cursor position, if it is over any overlay
    cursor: Option<Point>,
    last_tick: Instant,
    started: bool,
    outcome: Option<PickOutcome>,
    error: Option<anyhow::Error>,
}

impl PickApp {
    pub fn new(coordinator: SessionCoordinator, tick_interval: Duration) -> Self {
        Self {
            coordinator,
            tick_interval,
            context: None,
            windows: HashMap::new(),
            cursor: None,
            last_tick: Instant::now(),
            started: false,
            outcome: None,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let handles: Vec<MonitorHandle> = event_loop.available_monitors().collect();
        let monitors: Vec<MonitorDescriptor> = handles
            .iter()
            .enumerate()
            .map(|(i, handle)| describe_monitor(i as u32, handle))
            .collect();
        for m in &monitors {
            tracing::debug!("Monitor {} {:?} at {:?}", m.id, m.name, m.rect);
        }

        // Capture happens here, before any overlay is on screen
        if self.coordinator.start_pick(&monitors) == 0 {
            self.finish(event_loop, PickOutcome::Cancelled);
            return Ok(());
        }

        let context = Context::new(event_loop.owned_display_handle())
            .map_err(|e| anyhow::anyhow!("Failed to create softbuffer context: {}", e))?;
        for (handle, monitor) in handles.into_iter().zip(monitors) {
            if self.coordinator.session(monitor.id).is_none() {
                continue;
            }
            let overlay = OverlayWindow::open(event_loop, &context, handle, monitor)?;
            overlay.window.request_redraw();
            self.windows.insert(overlay.window.id(), overlay);
        }
        self.context = Some(context);

        self.last_tick = Instant::now();
        Ok(())
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop, outcome: PickOutcome) {
        tracing::debug!("Pick finished: {:?}", outcome);
        self.outcome = Some(outcome);
        self.coordinator.close_all();
        self.windows.clear();
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error = Some(error);
        self.finish(event_loop, PickOutcome::Cancelled);
    }

    fn send_input(&mut self, event_loop: &ActiveEventLoop, monitor: u32, input: OverlayInput) {
        match self.coordinator.handle_input(monitor, input) {
            Ok(Some(outcome)) => self.finish(event_loop, outcome),
            Ok(None) => {}
            Err(e) => tracing::debug!("Input ignored: {}", e),
        }
    }

    pub fn into_result(self) -> anyhow::Result<PickOutcome> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(self.outcome.unwrap_or(PickOutcome::Cancelled))
    }
}

fn describe_monitor(id: u32, handle: &MonitorHandle) -> MonitorDescriptor {
    let position = handle.position();
    let size = handle.size();
    MonitorDescriptor::new(
        id,
        handle.name().unwrap_or_else(|| format!("monitor-{}", id)),
        Rect::new(position.x, position.y, size.width, size.height),
    )
}

impl ApplicationHandler for PickApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(overlay) = self.windows.get_mut(&window_id) else {
            return;
        };
        let monitor = overlay.monitor.id;

        match event {
            WindowEvent::RedrawRequested => {
                if let Err(e) = overlay.present(&mut self.coordinator) {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let local = Point::new(position.x as i32, position.y as i32);
                overlay.cursor = Some(local);
                self.cursor = Some(overlay.monitor.to_global(local));
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(local) = overlay.cursor.take() {
                    if self.cursor == Some(overlay.monitor.to_global(local)) {
                        self.cursor = None;
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                // Without a known position the press counts as outside
                let position = overlay.cursor.unwrap_or(Point::new(-1, -1));
                let input = match button {
                    MouseButton::Left => OverlayInput::Primary(position),
                    MouseButton::Right => OverlayInput::Secondary,
                    _ => return,
                };
                self.send_input(event_loop, monitor, input);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    self.send_input(event_loop, monitor, OverlayInput::CancelKey);
                }
            }
            WindowEvent::CloseRequested => {
                self.send_input(event_loop, monitor, OverlayInput::CancelKey);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.windows.is_empty() {
            return;
        }

        let now = Instant::now();
        if now.duration_since(self.last_tick) >= self.tick_interval {
            self.last_tick = now;
            let dirty = self.coordinator.tick(self.cursor);
            for overlay in self.windows.values().filter(|w| dirty.contains(&w.monitor.id)) {
                overlay.window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.last_tick + self.tick_interval));
    }
}

/// Run one pick attempt on every monitor and return its outcome
pub fn run_pick(
    coordinator: SessionCoordinator,
    tick_interval: Duration,
) -> anyhow::Result<PickOutcome> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = PickApp::new(coordinator, tick_interval);
    event_loop.run_app(&mut app).context("Event loop failed")?;
    app.into_result()
}
