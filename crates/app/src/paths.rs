//! Per-user file locations
//!
//! colorpick keeps settings and logs in one directory named after the
//! binary, inside the platform config dir (`~/.config` on Linux,
//! `%APPDATA%` on Windows).

use anyhow::Context;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "colorpick";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Locate the per-user directory. `None` when the platform has no
    /// config dir (no home directory, for example).
    pub fn locate() -> Option<Self> {
        dirs::config_dir().map(Self::under)
    }

    /// Paths rooted in `base/colorpick`
    pub fn under(base: impl Into<PathBuf>) -> Self {
        Self {
            root: base.into().join(APP_DIR),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Create the logs dir if needed and return it
    pub fn create_logs_dir(&self) -> anyhow::Result<PathBuf> {
        let dir = self.logs_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        Ok(dir)
    }
}
