//! Configuration types.
//!
//! All settings live in one [`Settings`] value loaded from
//! `<config dir>/tally/settings.toml`. Hosts load it once and hand it to the
//! parts that need it; nothing reads configuration from ambient state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paging::PageSize;
use crate::selection::{SelectionGranularity, StaleSelection};

/// Process-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Appearance settings
    #[serde(default)]
    pub appearance: AppearanceConfig,

    /// List view defaults
    #[serde(default)]
    pub lists: ListConfig,
}

/// Appearance configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Theme mode: "light", "dark", or "system"
    #[serde(default)]
    pub theme: ThemeMode,

    /// Accent color name
    #[serde(default)]
    pub accent_color: AccentColor,
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Accent color selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Purple,
    Blue,
    Green,
    Orange,
    Pink,
    Amber,
}

/// Defaults applied when a list view is mounted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Rows per page for new views.
    #[serde(default)]
    pub default_page_size: PageSize,

    /// Scope of "select all".
    #[serde(default)]
    pub selection_granularity: SelectionGranularity,

    /// Whether selections outside the filtered result are dropped.
    #[serde(default)]
    pub stale_selection: StaleSelection,
}

impl Settings {
    /// Load settings from the default location.
    ///
    /// A missing file is not an error; defaults are returned.
    pub fn load() -> Result<Self, ConfigError> {
        let path = settings_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Write settings to a file, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tally"))
}

/// Get the path to settings.toml.
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.toml"))
}
