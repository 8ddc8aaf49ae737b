//! Desktop notifications

use anyhow::Context;
use overlay::Notifier;
use std::time::Duration;

/// Sends notifications through `notify-send` where available, otherwise
/// writes them to the log.
pub struct DesktopNotifier {
    program: Option<String>,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        let program = cfg!(all(unix, not(target_os = "macos"))).then(|| "notify-send".to_string());
        Self { program }
    }
}

impl DesktopNotifier {
    /// Use a specific notification program taking `notify-send` arguments
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, body: &str, duration: Duration) -> anyhow::Result<()> {
        let Some(program) = &self.program else {
            tracing::info!("{}: {}", title, body);
            return Ok(());
        };

        std::process::Command::new(program)
            .args(["-a", "colorpick", "-t"])
            .arg(duration.as_millis().to_string())
            .arg(title)
            .arg(body)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to run {}", program))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_an_error() {
        let mut notifier = DesktopNotifier::with_program("colorpick-no-such-notifier");
        let result = notifier.notify(
            "Color Picked!",
            "Copied to clipboard: FF0080",
            Duration::from_millis(2000),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn spawns_program_with_arguments() {
        let mut notifier = DesktopNotifier::with_program("true");
        assert!(notifier
            .notify("Color Picked!", "Copied to clipboard: FF0080", Duration::from_millis(2000))
            .is_ok());
    }
}
