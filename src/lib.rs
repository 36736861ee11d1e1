//! # ProbeKit
//!
//! Probe operation setup and live path preview for CNC machines:
//! - XYZ corner, outside corner, inside corner and Z touch-plate probing
//! - Validated per-mode probe parameters with change notification
//! - Live probe path preview kept in step with the selected mode
//! - Persisted probe settings between sessions
//!
//! ## Architecture
//!
//! ProbeKit is organized as a workspace with multiple crates:
//!
//! 1. **probekit-core** - Units, positions, errors, machine state access
//! 2. **probekit-visualizer** - Preview geometry and the renderable registry
//! 3. **probekit-probe** - Parameters, modes, descriptors, preview coordination
//! 4. **probekit-settings** - Settings snapshots, persistence, panel config
//! 5. **probekit** - The probe panel that ties them together

pub mod panel;

pub use panel::ProbePanel;

pub use probekit_core::{
    ControllerState, Error, EventDispatcher, MachineEvent, MachineSnapshot, MachineStateProvider,
    ParameterError, Position, ProbeError, Result, SharedMachineState, Units, WorkCoordinateSystem,
};

pub use probekit_probe::{
    submit, DescriptorBuilder, FieldKey, FieldSource, LoggingEngine, Mode, ModeSelector,
    ParameterChange, ParameterModel, ParameterValues, PreviewCoordinator, ProbeEngine,
    ProbeFamily, ProbeOperationDescriptor,
};

pub use probekit_settings::{
    PanelConfig, SettingsError, SettingsManager, SettingsRecord, SettingsSnapshot, SettingsStore,
};

pub use probekit_visualizer::{
    CornerPreview, MovementType, PathSegment, PreviewGeometry, PreviewId, PreviewKind,
    RenderableRegistry, VisualizationPipeline, ZAxisPreview,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
