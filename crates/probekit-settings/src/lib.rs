//! ProbeKit Settings Crate
//!
//! Handles probe settings snapshots, their versioned on-disk record, and the
//! probe panel configuration.

pub mod config;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod snapshot;

pub use config::PanelConfig;
pub use error::{SettingsError, SettingsResult};
pub use manager::SettingsManager;
pub use persistence::{SettingsRecord, SettingsStore, CURRENT_VERSION};
pub use snapshot::SettingsSnapshot;
