//! Settings locations
//!
//! Resolves where ProbeKit keeps its files inside the platform
//! configuration directory.

use std::path::PathBuf;

use crate::error::{SettingsError, SettingsResult};

const APP_DIR: &str = "probekit";
const SETTINGS_FILE: &str = "probe.toml";

/// Locates the configuration directory and the settings file inside it
pub struct SettingsManager;

impl SettingsManager {
    /// `<platform config dir>/probekit`
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
            })
    }

    /// Default location of the persisted probe settings
    pub fn settings_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }
}
