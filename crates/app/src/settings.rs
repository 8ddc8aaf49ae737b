//! User settings persistence
//!
//! Stored as JSON in `<config>/settings.json`.

use crate::paths::AppPaths;
use anyhow::Context;
use capture::ExternalCapture;
use color::ColorFormat;
use overlay::{FormatStore, MagnifierConfig, OverlayConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Index of the selected color format
    pub color_format: usize,
    pub capture_program: String,
    /// `{output}` is replaced with the screenshot path
    pub capture_args: Vec<String>,
    pub capture_timeout_ms: u64,
    pub zoom_factor: u32,
    pub magnifier_size: u32,
    pub magnifier_offset: i32,
    pub tick_interval_ms: u64,
    pub font_path: Option<PathBuf>,

    /// Where this instance is saved; `None` when no config dir exists
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let magnifier = MagnifierConfig::default();
        Self {
            color_format: ColorFormat::default().index(),
            capture_program: "spectacle".to_string(),
            capture_args: ["-f", "-b", "-n", "-o", capture::OUTPUT_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            capture_timeout_ms: ExternalCapture::DEFAULT_TIMEOUT.as_millis() as u64,
            zoom_factor: magnifier.zoom_factor,
            magnifier_size: magnifier.box_size,
            magnifier_offset: magnifier.offset,
            tick_interval_ms: 16,
            font_path: None,
            path: None,
        }
    }
}

impl Settings {
    /// Load settings from the config dir, or defaults
    pub fn load() -> Self {
        match AppPaths::locate() {
            Some(paths) => Self::load_from(&paths.settings_file()),
            None => {
                tracing::debug!("No config directory available, using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`. Missing or unreadable files give defaults
    /// that will be saved back to `path`.
    pub fn load_from(path: &Path) -> Self {
        let mut settings = if !path.exists() {
            tracing::debug!("Settings file not found at {}, using defaults", path.display());
            Self::default()
        } else {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Settings>(&content) {
                    Ok(settings) => {
                        tracing::debug!("Loaded settings from {}", path.display());
                        settings
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                    Self::default()
                }
            }
        };
        settings.path = Some(path.to_path_buf());
        settings
    }

    /// Save settings, creating the config directory if needed
    pub fn save(&self) -> anyhow::Result<()> {
        let path = self.path.as_ref().context("No config directory available")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Selected format. Unknown indices fall back to the default.
    pub fn format(&self) -> ColorFormat {
        ColorFormat::from_index(self.color_format).unwrap_or_else(|e| {
            tracing::warn!("{}, using {}", e, ColorFormat::default());
            ColorFormat::default()
        })
    }

    /// Update the format and save
    pub fn set_format(&mut self, format: ColorFormat) -> anyhow::Result<()> {
        self.color_format = format.index();
        self.save()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn capture(&self) -> ExternalCapture {
        ExternalCapture::new(
            self.capture_program.clone(),
            self.capture_args.clone(),
            Duration::from_millis(self.capture_timeout_ms),
        )
    }

    /// Magnifier geometry, clamped so hand-edited values cannot overflow
    pub fn magnifier(&self) -> MagnifierConfig {
        let config = MagnifierConfig {
            zoom_factor: self.zoom_factor,
            box_size: self.magnifier_size,
            offset: self.magnifier_offset,
        };
        let clamped = config.clamped();
        if clamped != config {
            tracing::warn!("Magnifier settings out of range, using {:?}", clamped);
        }
        clamped
    }

    /// Overlay configuration, loading the font from disk
    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            magnifier: self.magnifier(),
            font: overlay::load_font(self.font_path.as_deref()).map(Rc::new),
        }
    }
}

impl FormatStore for Settings {
    fn load_format(&self) -> ColorFormat {
        self.format()
    }

    fn save_format(&mut self, format: ColorFormat) -> anyhow::Result<()> {
        self.set_format(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));

        assert_eq!(settings.format(), ColorFormat::Html);
        assert_eq!(settings.capture_program, "spectacle");
        assert_eq!(settings.capture_args, ["-f", "-b", "-n", "-o", "{output}"]);
        assert_eq!(settings.capture().timeout(), Duration::from_millis(2000));
        assert_eq!(settings.magnifier(), MagnifierConfig::default());
    }

    #[test]
    fn format_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::load_from(&path);
        settings.save_format(ColorFormat::VbHex).unwrap();

        let reloaded = Settings::load_from(&path);
        assert_eq!(reloaded.load_format(), ColorFormat::VbHex);
        assert_eq!(reloaded.color_format, 3);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "color_format": 7, "zoom_factor": 8 }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.format(), ColorFormat::Hsv);
        assert_eq!(settings.magnifier().zoom_factor, 8);
        assert_eq!(settings.magnifier_size, 150);
        assert_eq!(settings.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn extreme_magnifier_values_are_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "zoom_factor": 4294967295, "magnifier_size": 4294967295, "magnifier_offset": -7 }"#,
        )
        .unwrap();

        let magnifier = Settings::load_from(&path).magnifier();
        assert_eq!(magnifier.zoom_factor, 64);
        assert_eq!(magnifier.box_size, 1024);
        assert_eq!(magnifier.offset, 0);

        // Layout math stays in range at the far corner of a large monitor
        let bounds = capture::Rect::new(0, 0, 7680, 4320);
        let layout = magnifier.layout(capture::Point::new(7679, 4319), bounds).unwrap();
        assert!(layout.box_origin.x >= 0 && layout.box_origin.y >= 0);
    }

    #[test]
    fn zero_zoom_becomes_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "zoom_factor": 0, "magnifier_size": 0 }"#).unwrap();

        let magnifier = Settings::load_from(&path).magnifier();
        assert_eq!(magnifier.zoom_factor, 1);
        assert_eq!(magnifier.box_size, 16);
        assert_eq!(magnifier.capture_pixels(), 15);
    }

    #[test]
    fn out_of_range_index_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "color_format": 42 }"#).unwrap();

        assert_eq!(Settings::load_from(&path).format(), ColorFormat::Html);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.color_format, 0);

        // Saving overwrites the corrupt file
        settings.save().unwrap();
        assert!(serde_json::from_str::<Settings>(&std::fs::read_to_string(&path).unwrap()).is_ok());
    }

    #[test]
    fn save_without_location_fails() {
        assert!(Settings::default().save().is_err());
    }
}
