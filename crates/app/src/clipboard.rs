//! System clipboard via arboard
//!
//! On Linux the clipboard contents belong to the process that set them, so
//! each write is served from a background thread until another program
//! takes ownership. [`ClipboardGuard::wait`] keeps the process alive until
//! then.

use arboard::Clipboard;
use crossbeam_channel::{unbounded, Receiver, Sender};
use overlay::ClipboardSink;
use std::thread::JoinHandle;

pub struct SystemClipboard {
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    servers: Sender<JoinHandle<()>>,
}

/// Waits for background clipboard servers on exit
pub struct ClipboardGuard {
    servers: Receiver<JoinHandle<()>>,
}

impl SystemClipboard {
    pub fn new() -> (Self, ClipboardGuard) {
        let (tx, rx) = unbounded();
        (Self { servers: tx }, ClipboardGuard { servers: rx })
    }
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        use arboard::SetExtLinux;

        let text = text.to_string();
        let handle = std::thread::Builder::new()
            .name("clipboard".to_string())
            .spawn(move || {
                let result = Clipboard::new().and_then(|mut cb| cb.set().wait().text(text));
                match result {
                    Ok(()) => tracing::debug!("Clipboard ownership released"),
                    Err(e) => tracing::warn!("Clipboard write failed: {}", e),
                }
            })?;
        let _ = self.servers.send(handle);
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut cb = Clipboard::new()?;
        cb.set_text(text.to_string())?;
        Ok(())
    }
}

impl ClipboardGuard {
    /// Block until every clipboard server thread has finished
    pub fn wait(self) {
        let handles: Vec<_> = self.servers.try_iter().collect();
        if handles.is_empty() {
            return;
        }
        tracing::info!("Serving clipboard until another application takes it");
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("Clipboard thread panicked");
            }
        }
    }
}
