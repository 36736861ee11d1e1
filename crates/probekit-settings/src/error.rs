//! Error types for the settings crate.
//!
//! Covers snapshot decoding, the persisted settings record and the panel
//! configuration file.

use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The persisted payload is malformed or holds values the panel
    /// cannot accept. Nothing is restored from it.
    #[error("Corrupt settings snapshot: {0}")]
    CorruptSnapshot(String),

    /// Reading or writing a settings or config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot or a JSON config could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML file could not be parsed.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// A value could not be written as TOML.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The platform configuration directory is missing or unusable.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SettingsError {
    /// Whether the error came from the payload rather than the file system
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            SettingsError::CorruptSnapshot(_) | SettingsError::TomlDe(_)
        )
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
