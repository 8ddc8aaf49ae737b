//! Overlay module for ColorPick
//!
//! Provides frozen per-monitor screenshots with a pixel magnifier and
//! color readout, and coordinates one pick attempt across all monitors.

pub mod coordinator;
pub mod frame;
pub mod magnifier;
pub mod render;
pub mod screenshot;
pub mod session;
pub mod text;

pub use coordinator::{ClipboardSink, Collaborators, FormatStore, Notifier, SessionCoordinator};
pub use frame::Frame;
pub use magnifier::MagnifierConfig;
pub use render::MagnifierRenderer;
pub use screenshot::{Screenshot, ScreenshotCompositor};
pub use session::{OverlayInput, OverlaySession, SessionEvent, SessionState};
pub use text::{load_font, TextPainter};

use fontdue::Font;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("No overlay session for monitor {0}")]
    UnknownMonitor(u32),

    #[error("Overlay session already closed")]
    SessionClosed,
}

pub type OverlayResult<T> = Result<T, OverlayError>;

/// Result of one pick attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// Formatted color text
    Picked(String),
    Cancelled,
}

/// Settings shared by every session of a pick attempt
#[derive(Clone, Default)]
pub struct OverlayConfig {
    pub magnifier: MagnifierConfig,
    /// Font for the readout and placeholder text; text is skipped without one
    pub font: Option<Rc<Font>>,
}
