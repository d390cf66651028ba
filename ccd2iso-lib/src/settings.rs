//! Persisted defaults for conversions.
//!
//! The settings file lives at `~/.config/ccd2iso/settings.toml`. Every field
//! is optional; command-line flags take priority over what is stored here.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Canonical path to the settings file: `~/.config/ccd2iso/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("ccd2iso").join("settings.toml")
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub convert: ConvertSettings,
}

/// The `[convert]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Overwrite existing ISO files without `--force`.
    pub overwrite: bool,
    /// Keep the first session when a session marker is found.
    pub keep_partial: bool,
    /// Show a progress bar while converting.
    pub progress: bool,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            overwrite: false,
            keep_partial: true,
            progress: true,
        }
    }
}

impl Settings {
    /// Load settings from the canonical path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults silently; an unreadable or malformed one
    /// yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path` atomically, creating parent directories.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Save settings to the canonical path.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&settings_path())
    }
}

/// Pick a CLI override if present, otherwise the stored value.
pub fn resolve_flag(cli_override: Option<bool>, stored: bool) -> bool {
    cli_override.unwrap_or(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.convert.overwrite);
        assert!(settings.convert.keep_partial);
        assert!(settings.convert.progress);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[convert]\noverwrite = true\n").unwrap();
        let settings = Settings::load_from(&path);
        assert!(settings.convert.overwrite);
        assert!(settings.convert.keep_partial);
        assert!(settings.convert.progress);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[convert\noverwrite = ").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.convert.keep_partial = false;
        settings.convert.progress = false;
        settings.save_to(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_resolve_flag_prefers_cli() {
        assert!(resolve_flag(Some(true), false));
        assert!(!resolve_flag(Some(false), true));
        assert!(resolve_flag(None, true));
        assert!(!resolve_flag(None, false));
    }

    #[test]
    fn test_settings_path_ends_in_app_dir() {
        let path = settings_path();
        assert!(path.ends_with("ccd2iso/settings.toml"));
    }
}
