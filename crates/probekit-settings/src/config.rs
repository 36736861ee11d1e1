//! Probe panel configuration
//!
//! Loaded from a JSON or TOML file; every entry has a default so a partial
//! file is accepted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};
use crate::manager::SettingsManager;

/// Behaviour of the probe panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Where probe settings are persisted; the platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
    /// Save the settings when the panel closes
    pub autosave_on_close: bool,
    /// Disable edits and probing while the machine is not idle
    pub disable_controls_when_busy: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            settings_file: None,
            autosave_on_close: true,
            disable_controls_when_busy: true,
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::InvalidConfig(
            "Config file must be .json or .toml".to_string(),
        )),
    }
}

impl PanelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from `settings_file` but never write them back
    pub fn read_only(settings_file: impl Into<PathBuf>) -> Self {
        Self {
            settings_file: Some(settings_file.into()),
            autosave_on_close: false,
            ..Self::default()
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if let Some(path) = &self.settings_file {
            if path.as_os_str().is_empty() {
                return Err(SettingsError::InvalidConfig(
                    "settings_file must not be empty".to_string(),
                ));
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                return Err(SettingsError::InvalidConfig(format!(
                    "settings_file {} must be a .toml file",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Configured settings file, or the platform default
    pub fn resolved_settings_file(&self) -> SettingsResult<PathBuf> {
        match &self.settings_file {
            Some(path) => Ok(path.clone()),
            None => SettingsManager::settings_file_path(),
        }
    }
}
