//! # ProbeKit Core
//!
//! Core types, traits, and utilities for ProbeKit.
//! Provides units and work coordinate systems, machine positions, the
//! machine-state provider interface, and the shared error taxonomy.

pub mod data;
pub mod error;
pub mod machine;
pub mod types;

pub use data::{ControllerState, Position, Units, WorkCoordinateSystem};

pub use error::{Error, ParameterError, ProbeError, Result};

pub use machine::{
    EventDispatcher, MachineEvent, MachineSnapshot, MachineStateProvider, SharedMachineState,
};

// Re-export type aliases for convenience
pub use types::{shared, thread_safe_rw, Shared, ThreadSafeRw};
