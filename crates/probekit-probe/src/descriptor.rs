//! Probe operation descriptors
//!
//! A [`ProbeOperationDescriptor`] is everything the probing engine needs to
//! run one probe cycle. It is built on demand from the selected mode, the
//! parameter fields and the live machine position, handed to the engine,
//! and not kept afterwards.

use probekit_core::{MachineStateProvider, Position, ProbeError, Units, WorkCoordinateSystem};

use crate::mode::Mode;
use crate::parameters::{FieldKey, FieldSource};

/// Immutable description of a single probe cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOperationDescriptor {
    probe_diameter: f64,
    start_position: Position,
    distances: Position,
    offsets: Position,
    fast_rate: f64,
    slow_rate: f64,
    retract: f64,
    units: Units,
    work_coordinate_system: WorkCoordinateSystem,
}

impl ProbeOperationDescriptor {
    /// Probe tip diameter
    pub fn probe_diameter(&self) -> f64 {
        self.probe_diameter
    }

    /// Machine position when the operation was built
    pub fn start_position(&self) -> Position {
        self.start_position
    }

    /// Per-axis probe travel; axes the mode does not probe are zero
    pub fn distances(&self) -> Position {
        self.distances
    }

    /// Per-axis clearance offsets; axes the mode does not probe are zero
    pub fn offsets(&self) -> Position {
        self.offsets
    }

    /// Fast approach feed rate
    pub fn fast_rate(&self) -> f64 {
        self.fast_rate
    }

    /// Slow measuring feed rate
    pub fn slow_rate(&self) -> f64 {
        self.slow_rate
    }

    /// Back-off distance after contact
    pub fn retract(&self) -> f64 {
        self.retract
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Work coordinate system the result is written to
    pub fn work_coordinate_system(&self) -> WorkCoordinateSystem {
        self.work_coordinate_system
    }
}

/// Builds descriptors from the current setup
///
/// Stateless. Only the selected mode's own fields and the shared settings
/// are read, and the machine position is read at call time.
pub struct DescriptorBuilder;

impl DescriptorBuilder {
    /// Build the descriptor for `mode`
    ///
    /// # Errors
    /// [`ProbeError::InvalidMode`] for [`Mode::Settings`].
    pub fn build<F, M>(mode: Mode, fields: &F, machine: &M) -> Result<ProbeOperationDescriptor, ProbeError>
    where
        F: FieldSource + ?Sized,
        M: MachineStateProvider + ?Sized,
    {
        let (distances, offsets) = match mode {
            Mode::Xyz => (
                Position::new(
                    fields.field(FieldKey::XyzXDistance),
                    fields.field(FieldKey::XyzYDistance),
                    fields.field(FieldKey::XyzZDistance),
                ),
                Position::new(
                    fields.field(FieldKey::XyzXOffset),
                    fields.field(FieldKey::XyzYOffset),
                    fields.field(FieldKey::XyzZOffset),
                ),
            ),
            Mode::OutsideCorner => (
                Position::new(
                    fields.field(FieldKey::OutsideXDistance),
                    fields.field(FieldKey::OutsideYDistance),
                    0.0,
                ),
                Position::new(
                    fields.field(FieldKey::OutsideXOffset),
                    fields.field(FieldKey::OutsideYOffset),
                    0.0,
                ),
            ),
            // Provisional: mirrors the outside corner until inside probing is wired up.
            Mode::InsideCorner => (
                Position::new(
                    fields.field(FieldKey::InsideXDistance),
                    fields.field(FieldKey::InsideYDistance),
                    0.0,
                ),
                Position::new(
                    fields.field(FieldKey::InsideXOffset),
                    fields.field(FieldKey::InsideYOffset),
                    0.0,
                ),
            ),
            Mode::ZTouch => (
                Position::new(0.0, 0.0, fields.field(FieldKey::ZDistance)),
                Position::new(0.0, 0.0, fields.field(FieldKey::ZOffset)),
            ),
            Mode::Settings => {
                return Err(ProbeError::InvalidMode {
                    mode: mode.to_string(),
                })
            }
        };

        Ok(ProbeOperationDescriptor {
            probe_diameter: fields.field(FieldKey::ProbeDiameter),
            start_position: machine.machine_position(),
            distances,
            offsets,
            fast_rate: fields.field(FieldKey::FastFindRate),
            slow_rate: fields.field(FieldKey::SlowMeasureRate),
            retract: fields.field(FieldKey::RetractAmount),
            units: fields.units(),
            work_coordinate_system: fields.work_coordinate_system(),
        })
    }
}
