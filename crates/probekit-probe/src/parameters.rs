//! Probe parameter fields
//!
//! Every numeric input of the probe panel is a [`FieldKey`]. Keys belong to
//! exactly one probing mode, or to the shared settings used by every mode.
//! Each key declares its bounds and default value; [`ParameterValues`] holds
//! one value per key plus the two enumerated settings (units and work
//! coordinate system) and only ever contains values inside those bounds.

use probekit_core::{ParameterError, Units, WorkCoordinateSystem};
use std::fmt;
use std::str::FromStr;

use crate::mode::Mode;

/// Bound shared by every geometric field
pub const LARGE_BOUND: f64 = 1_000_000.0;

/// Minimum retract so the probe clears the surface before rapid moves
pub const MIN_RETRACT: f64 = 10.0;

/// Minimum feed rate for both approach speeds
pub const MIN_FEED_RATE: f64 = 1.0;

/// Machine axis a field applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// What a field measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// How far the probe may travel looking for contact
    Distance,
    /// Clearance between the contact point and the work origin
    Offset,
    /// Shared probe setting (diameter, feed rates, retract)
    Setting,
}

/// Key of a numeric probe parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    XyzXDistance,
    XyzYDistance,
    XyzZDistance,
    XyzXOffset,
    XyzYOffset,
    XyzZOffset,
    OutsideXDistance,
    OutsideYDistance,
    OutsideXOffset,
    OutsideYOffset,
    ZDistance,
    /// Touch plate thickness
    ZOffset,
    InsideXDistance,
    InsideYDistance,
    InsideXOffset,
    InsideYOffset,
    ProbeDiameter,
    FastFindRate,
    SlowMeasureRate,
    RetractAmount,
}

impl FieldKey {
    /// Number of keys
    pub const COUNT: usize = 20;

    /// Every key, in storage order
    pub const ALL: [FieldKey; FieldKey::COUNT] = [
        FieldKey::XyzXDistance,
        FieldKey::XyzYDistance,
        FieldKey::XyzZDistance,
        FieldKey::XyzXOffset,
        FieldKey::XyzYOffset,
        FieldKey::XyzZOffset,
        FieldKey::OutsideXDistance,
        FieldKey::OutsideYDistance,
        FieldKey::OutsideXOffset,
        FieldKey::OutsideYOffset,
        FieldKey::ZDistance,
        FieldKey::ZOffset,
        FieldKey::InsideXDistance,
        FieldKey::InsideYDistance,
        FieldKey::InsideXOffset,
        FieldKey::InsideYOffset,
        FieldKey::ProbeDiameter,
        FieldKey::FastFindRate,
        FieldKey::SlowMeasureRate,
        FieldKey::RetractAmount,
    ];

    /// Settings read by every operational mode
    pub const SHARED: [FieldKey; 4] = [
        FieldKey::ProbeDiameter,
        FieldKey::FastFindRate,
        FieldKey::SlowMeasureRate,
        FieldKey::RetractAmount,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Persisted name of the field
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::XyzXDistance => "xyzXDistance",
            FieldKey::XyzYDistance => "xyzYDistance",
            FieldKey::XyzZDistance => "xyzZDistance",
            FieldKey::XyzXOffset => "xyzXOffset",
            FieldKey::XyzYOffset => "xyzYOffset",
            FieldKey::XyzZOffset => "xyzZOffset",
            FieldKey::OutsideXDistance => "outsideXDistance",
            FieldKey::OutsideYDistance => "outsideYDistance",
            FieldKey::OutsideXOffset => "outsideXOffset",
            FieldKey::OutsideYOffset => "outsideYOffset",
            FieldKey::ZDistance => "zDistance",
            FieldKey::ZOffset => "zOffset",
            FieldKey::InsideXDistance => "insideXDistance",
            FieldKey::InsideYDistance => "insideYDistance",
            FieldKey::InsideXOffset => "insideXOffset",
            FieldKey::InsideYOffset => "insideYOffset",
            FieldKey::ProbeDiameter => "settingsProbeDiameter",
            FieldKey::FastFindRate => "settingsFastFindRate",
            FieldKey::SlowMeasureRate => "settingsSlowMeasureRate",
            FieldKey::RetractAmount => "settingsRetractAmount",
        }
    }

    /// The mode whose panel owns this field, `None` for shared settings
    pub fn mode(&self) -> Option<Mode> {
        match self {
            FieldKey::XyzXDistance
            | FieldKey::XyzYDistance
            | FieldKey::XyzZDistance
            | FieldKey::XyzXOffset
            | FieldKey::XyzYOffset
            | FieldKey::XyzZOffset => Some(Mode::Xyz),
            FieldKey::OutsideXDistance
            | FieldKey::OutsideYDistance
            | FieldKey::OutsideXOffset
            | FieldKey::OutsideYOffset => Some(Mode::OutsideCorner),
            FieldKey::ZDistance | FieldKey::ZOffset => Some(Mode::ZTouch),
            FieldKey::InsideXDistance
            | FieldKey::InsideYDistance
            | FieldKey::InsideXOffset
            | FieldKey::InsideYOffset => Some(Mode::InsideCorner),
            FieldKey::ProbeDiameter
            | FieldKey::FastFindRate
            | FieldKey::SlowMeasureRate
            | FieldKey::RetractAmount => None,
        }
    }

    pub fn axis(&self) -> Option<Axis> {
        match self {
            FieldKey::XyzXDistance
            | FieldKey::XyzXOffset
            | FieldKey::OutsideXDistance
            | FieldKey::OutsideXOffset
            | FieldKey::InsideXDistance
            | FieldKey::InsideXOffset => Some(Axis::X),
            FieldKey::XyzYDistance
            | FieldKey::XyzYOffset
            | FieldKey::OutsideYDistance
            | FieldKey::OutsideYOffset
            | FieldKey::InsideYDistance
            | FieldKey::InsideYOffset => Some(Axis::Y),
            FieldKey::XyzZDistance | FieldKey::XyzZOffset | FieldKey::ZDistance | FieldKey::ZOffset => {
                Some(Axis::Z)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::XyzXDistance
            | FieldKey::XyzYDistance
            | FieldKey::XyzZDistance
            | FieldKey::OutsideXDistance
            | FieldKey::OutsideYDistance
            | FieldKey::ZDistance
            | FieldKey::InsideXDistance
            | FieldKey::InsideYDistance => FieldKind::Distance,
            FieldKey::XyzXOffset
            | FieldKey::XyzYOffset
            | FieldKey::XyzZOffset
            | FieldKey::OutsideXOffset
            | FieldKey::OutsideYOffset
            | FieldKey::ZOffset
            | FieldKey::InsideXOffset
            | FieldKey::InsideYOffset => FieldKind::Offset,
            _ => FieldKind::Setting,
        }
    }

    /// Inclusive `(min, max)` bounds
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            FieldKey::ProbeDiameter => (0.0, LARGE_BOUND),
            FieldKey::FastFindRate | FieldKey::SlowMeasureRate => (MIN_FEED_RATE, LARGE_BOUND),
            FieldKey::RetractAmount => (MIN_RETRACT, LARGE_BOUND),
            _ => (-LARGE_BOUND, LARGE_BOUND),
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            FieldKey::ProbeDiameter => 10.0,
            FieldKey::FastFindRate => 250.0,
            FieldKey::SlowMeasureRate => 100.0,
            FieldKey::RetractAmount => 15.0,
            FieldKey::ZOffset => 10.0,
            key => match key.kind() {
                FieldKind::Distance => 10.0,
                _ => 2.0,
            },
        }
    }

    /// Check a candidate value against this field's bounds
    pub fn validate(&self, value: f64) -> Result<f64, ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NotFinite {
                field: self.name().to_string(),
            });
        }

        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(ParameterError::OutOfRange {
                field: self.name().to_string(),
                value,
                min,
                max,
            });
        }

        Ok(value)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .iter()
            .find(|key| key.name() == s)
            .copied()
            .ok_or_else(|| format!("Unknown probe field: {}", s))
    }
}

/// Read access to probe parameters
///
/// Descriptor building and preview updates go through this trait so they
/// can be handed either the live model or a plain copy of its values.
pub trait FieldSource {
    /// Current value of a numeric field
    fn field(&self, key: FieldKey) -> f64;

    /// Selected measurement units
    fn units(&self) -> Units;

    /// Selected target work coordinate system
    fn work_coordinate_system(&self) -> WorkCoordinateSystem;
}

/// One value per field plus the enumerated settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterValues {
    fields: [f64; FieldKey::COUNT],
    units: Units,
    work_coordinate_system: WorkCoordinateSystem,
}

impl ParameterValues {
    /// Values with every field at its default
    pub fn new() -> Self {
        let mut fields = [0.0; FieldKey::COUNT];
        for key in FieldKey::ALL {
            fields[key.index()] = key.default_value();
        }
        Self {
            fields,
            units: Units::default(),
            work_coordinate_system: WorkCoordinateSystem::default(),
        }
    }

    pub fn get(&self, key: FieldKey) -> f64 {
        self.fields[key.index()]
    }

    /// Set a field, rejecting values outside its bounds
    pub fn set(&mut self, key: FieldKey, value: f64) -> Result<(), ParameterError> {
        self.fields[key.index()] = key.validate(value)?;
        Ok(())
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: FieldKey, value: f64) -> Result<Self, ParameterError> {
        self.set(key, value)?;
        Ok(self)
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    pub fn work_coordinate_system(&self) -> WorkCoordinateSystem {
        self.work_coordinate_system
    }

    pub fn set_work_coordinate_system(&mut self, wcs: WorkCoordinateSystem) {
        self.work_coordinate_system = wcs;
    }

    /// Iterate `(key, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, f64)> + '_ {
        FieldKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }
}

impl Default for ParameterValues {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSource for ParameterValues {
    fn field(&self, key: FieldKey) -> f64 {
        self.get(key)
    }

    fn units(&self) -> Units {
        self.units
    }

    fn work_coordinate_system(&self) -> WorkCoordinateSystem {
        self.work_coordinate_system
    }
}
