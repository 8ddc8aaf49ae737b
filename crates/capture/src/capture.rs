//! External screenshot tool invocation

use crate::{CaptureError, CaptureResult, DesktopFrame};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Argument placeholder replaced with the output image path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Source of full virtual-desktop captures
pub trait CaptureSource {
    /// Capture every monitor into a single image
    fn capture_desktop(&mut self) -> CaptureResult<DesktopFrame>;
}

/// Capture by running an external tool that writes an image file.
///
/// The default invocation is `spectacle -f -b -n -o <path>`: all screens,
/// no interaction, no notification.
#[derive(Debug, Clone)]
pub struct ExternalCapture {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for ExternalCapture {
    fn default() -> Self {
        Self::spectacle()
    }
}

impl ExternalCapture {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

    /// Create a capture command. Arguments may contain [`OUTPUT_PLACEHOLDER`].
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn spectacle() -> Self {
        Self::new(
            "spectacle",
            ["-f", "-b", "-n", "-o", OUTPUT_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Self::DEFAULT_TIMEOUT,
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arguments with the output path substituted
    fn resolved_args(&self, output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
            .collect()
    }

    /// Run the tool and wait at most `timeout` for it.
    ///
    /// A tool still running at the deadline is killed. If it managed to
    /// write a readable image anyway, that image is used.
    fn run(&self, output: &Path) -> CaptureResult<DesktopFrame> {
        let started = Instant::now();
        let mut child = Command::new(&self.program)
            .args(self.resolved_args(output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CaptureError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        match child.wait_timeout(self.timeout)? {
            Some(status) if !status.success() => {
                tracing::debug!(%status, "capture tool failed");
                return Err(CaptureError::ToolFailed(status));
            }
            Some(_) => {
                tracing::debug!(elapsed = ?started.elapsed(), "capture tool finished");
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                if !output.exists() {
                    return Err(CaptureError::Timeout(self.timeout.as_millis() as u64));
                }
                tracing::debug!("capture tool timed out, reading partial output");
            }
        }

        DesktopFrame::load(output)
    }
}

impl CaptureSource for ExternalCapture {
    fn capture_desktop(&mut self) -> CaptureResult<DesktopFrame> {
        let temp_dir = std::env::temp_dir().join(format!("colorpick_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&temp_dir)?;
        let output: PathBuf = temp_dir.join("fullscreen.png");

        let result = self.run(&output);

        if let Err(e) = std::fs::remove_dir_all(&temp_dir) {
            tracing::debug!("failed to remove {}: {}", temp_dir.display(), e);
        }

        result
    }
}
