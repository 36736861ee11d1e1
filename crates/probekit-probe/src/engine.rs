//! Probing engine interface
//!
//! The panel does not generate motion itself. It hands a finished
//! [`ProbeOperationDescriptor`] to whatever implements [`ProbeEngine`],
//! choosing the entry point from the selected mode.

use probekit_core::ProbeError;
use std::fmt;

use crate::descriptor::ProbeOperationDescriptor;
use crate::mode::Mode;

/// Engine entry point a mode dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeFamily {
    /// Corner probe of all three axes
    Xyz,
    OutsideCorner,
    InsideCorner,
    /// Single-axis probe against a touch plate
    SingleAxis,
}

impl fmt::Display for ProbeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFamily::Xyz => write!(f, "XYZ"),
            ProbeFamily::OutsideCorner => write!(f, "Outside Corner"),
            ProbeFamily::InsideCorner => write!(f, "Inside Corner"),
            ProbeFamily::SingleAxis => write!(f, "Single Axis"),
        }
    }
}

/// Executes probe cycles
pub trait ProbeEngine {
    fn probe_xyz(&mut self, descriptor: &ProbeOperationDescriptor);

    fn probe_outside_corner(&mut self, descriptor: &ProbeOperationDescriptor);

    /// Inside corner cycle. Engines without support ignore the request.
    fn probe_inside_corner(&mut self, descriptor: &ProbeOperationDescriptor) {
        let _ = descriptor;
        tracing::warn!("Inside corner probing is not supported by this engine");
    }

    fn probe_z(&mut self, descriptor: &ProbeOperationDescriptor);
}

/// Route a descriptor to the engine entry point for `mode`
pub fn submit<E>(engine: &mut E, mode: Mode, descriptor: &ProbeOperationDescriptor) -> Result<(), ProbeError>
where
    E: ProbeEngine + ?Sized,
{
    let family = mode.family().ok_or_else(|| ProbeError::InvalidMode {
        mode: mode.to_string(),
    })?;

    tracing::info!(
        "Submitting {} probe from {} into {}",
        family,
        descriptor.start_position(),
        descriptor.work_coordinate_system()
    );

    match family {
        ProbeFamily::Xyz => engine.probe_xyz(descriptor),
        ProbeFamily::OutsideCorner => engine.probe_outside_corner(descriptor),
        ProbeFamily::InsideCorner => engine.probe_inside_corner(descriptor),
        ProbeFamily::SingleAxis => engine.probe_z(descriptor),
    }
    Ok(())
}

/// Engine that logs and records requests without moving anything
#[derive(Debug, Default)]
pub struct LoggingEngine {
    history: Vec<(ProbeFamily, ProbeOperationDescriptor)>,
}

impl LoggingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received, oldest first
    pub fn history(&self) -> &[(ProbeFamily, ProbeOperationDescriptor)] {
        &self.history
    }

    pub fn last(&self) -> Option<&(ProbeFamily, ProbeOperationDescriptor)> {
        self.history.last()
    }

    fn record(&mut self, family: ProbeFamily, descriptor: &ProbeOperationDescriptor) {
        tracing::info!(
            "{} probe: distances {}, offsets {}, feed {}/{}, retract {} {}",
            family,
            descriptor.distances(),
            descriptor.offsets(),
            descriptor.fast_rate(),
            descriptor.slow_rate(),
            descriptor.retract(),
            descriptor.units()
        );
        self.history.push((family, *descriptor));
    }
}

impl ProbeEngine for LoggingEngine {
    fn probe_xyz(&mut self, descriptor: &ProbeOperationDescriptor) {
        self.record(ProbeFamily::Xyz, descriptor);
    }

    fn probe_outside_corner(&mut self, descriptor: &ProbeOperationDescriptor) {
        self.record(ProbeFamily::OutsideCorner, descriptor);
    }

    fn probe_inside_corner(&mut self, descriptor: &ProbeOperationDescriptor) {
        self.record(ProbeFamily::InsideCorner, descriptor);
    }

    fn probe_z(&mut self, descriptor: &ProbeOperationDescriptor) {
        self.record(ProbeFamily::SingleAxis, descriptor);
    }
}
