//! Settings Persistence
//!
//! Probe settings are stored as a small versioned TOML record whose
//! `json_data` entry carries the encoded [`SettingsSnapshot`]. Versioning the
//! record from the start leaves room to migrate the payload later.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SettingsResult;
use crate::snapshot::SettingsSnapshot;

/// Version written by this release
pub const CURRENT_VERSION: &str = "1.0";

/// Versioned container around the snapshot payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data: Option<String>,
}

impl SettingsRecord {
    /// Record holding `snapshot` at the current version
    pub fn from_snapshot(snapshot: &SettingsSnapshot) -> SettingsResult<Self> {
        Ok(Self {
            version: Some(CURRENT_VERSION.to_string()),
            json_data: Some(snapshot.encode()?),
        })
    }

    /// Decode the carried snapshot
    ///
    /// A record without payload holds nothing to restore. Records of an
    /// unknown or missing version are decoded as if current.
    pub fn snapshot(&self) -> SettingsResult<Option<SettingsSnapshot>> {
        match self.version.as_deref() {
            Some(CURRENT_VERSION) => {}
            Some(other) => {
                tracing::warn!("Unknown settings version {}, decoding as {}", other, CURRENT_VERSION)
            }
            None => tracing::warn!("Settings record has no version, decoding as {}", CURRENT_VERSION),
        }

        match &self.json_data {
            Some(payload) => SettingsSnapshot::decode(payload).map(Some),
            None => {
                tracing::debug!("Settings record has no payload");
                Ok(None)
            }
        }
    }
}

/// Reads and writes the settings record file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing file means nothing was saved yet.
    pub fn load(&self) -> SettingsResult<Option<SettingsRecord>> {
        if !self.path.exists() {
            tracing::debug!("No saved probe settings at {}", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let record: SettingsRecord = toml::from_str(&content)?;
        tracing::debug!("Loaded probe settings from {}", self.path.display());
        Ok(Some(record))
    }

    /// Write the record, creating parent directories as needed
    pub fn save(&self, record: &SettingsRecord) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(record)?;
        std::fs::write(&self.path, content)?;
        tracing::info!("Saved probe settings to {}", self.path.display());
        Ok(())
    }

    /// Load and decode in one step
    pub fn load_snapshot(&self) -> SettingsResult<Option<SettingsSnapshot>> {
        match self.load()? {
            Some(record) => record.snapshot(),
            None => Ok(None),
        }
    }

    /// Encode and save in one step
    pub fn save_snapshot(&self, snapshot: &SettingsSnapshot) -> SettingsResult<()> {
        self.save(&SettingsRecord::from_snapshot(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use probekit_probe::{Mode, ParameterValues};

    #[test]
    fn test_record_carries_current_version() {
        let snapshot = SettingsSnapshot::from_values(&ParameterValues::default(), Mode::Xyz);
        let record = SettingsRecord::from_snapshot(&snapshot).unwrap();
        assert_eq!(record.version.as_deref(), Some("1.0"));
        assert_eq!(record.snapshot().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_record_without_payload_restores_nothing() {
        let record: SettingsRecord = toml::from_str("version = \"1.0\"").unwrap();
        assert_eq!(record.snapshot().unwrap(), None);
    }

    #[test]
    fn test_unknown_version_is_decoded() {
        let record = SettingsRecord {
            version: Some("0.9".to_string()),
            json_data: Some(r#"{"zDistance": 6.0}"#.to_string()),
        };
        let snapshot = record.snapshot().unwrap().unwrap();
        assert_eq!(snapshot.z_distance, Some(6.0));
    }

    #[test]
    fn test_corrupt_payload() {
        let record = SettingsRecord {
            version: None,
            json_data: Some("{".to_string()),
        };
        assert!(matches!(
            record.snapshot(),
            Err(SettingsError::CorruptSnapshot(_))
        ));
    }
}
