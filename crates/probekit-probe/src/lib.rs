//! # ProbeKit Probe
//!
//! The probing panel's logic without any widgets: the parameter model, the
//! mode selector, descriptor building for the probing engine, and the
//! coordinator that keeps the path preview in step with the panel.

pub mod coordinator;
pub mod descriptor;
pub mod engine;
pub mod mode;
pub mod model;
pub mod parameters;

pub use coordinator::PreviewCoordinator;
pub use descriptor::{DescriptorBuilder, ProbeOperationDescriptor};
pub use engine::{submit, LoggingEngine, ProbeEngine, ProbeFamily};
pub use mode::{Mode, ModeListener, ModeSelector};
pub use model::{ListenerId, ParameterChange, ParameterListener, ParameterModel, MAX_NOTIFY_PASSES};
pub use parameters::{
    Axis, FieldKey, FieldKind, FieldSource, ParameterValues, LARGE_BOUND, MIN_FEED_RATE,
    MIN_RETRACT,
};
