//! Error handling for ProbeKit
//!
//! Provides the error types shared by all crates:
//! - Parameter errors (rejected field edits)
//! - Probe errors (descriptor building and dispatch)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! None of them is fatal: a rejected edit leaves the model untouched and a
//! rejected probe request leaves the machine untouched.

use thiserror::Error;

/// Parameter error type
///
/// Raised when a field edit is rejected. The field keeps its prior value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Value outside the field's declared bounds
    #[error("Value {value} for '{field}' is out of range [{min}, {max}]")]
    OutOfRange {
        /// The field name.
        field: String,
        /// The rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// NaN or infinite value
    #[error("Value for '{field}' must be a finite number")]
    NotFinite {
        /// The field name.
        field: String,
    },
}

/// Probe error type
///
/// Represents errors raised while turning the current setup into a probe
/// operation and handing it to the probing engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// A descriptor was requested for a mode that cannot probe
    #[error("Mode '{mode}' does not describe a probe operation")]
    InvalidMode {
        /// The mode name.
        mode: String,
    },

    /// The machine is busy, probe controls are disabled
    #[error("Machine is not idle (state: {state})")]
    MachineNotIdle {
        /// The controller state reported by the machine.
        state: String,
    },
}

/// Main error type for ProbeKit
///
/// A unified error type that can represent any core error.
#[derive(Error, Debug)]
pub enum Error {
    /// Parameter error
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Probe error
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
