//! Data models for positions, units, work coordinates and controller state
//!
//! This module provides:
//! - Three-axis machine/work positions
//! - Unit management (MM, INCH) with the index order used by persisted settings
//! - Work coordinate systems G54-G59
//! - Controller state, reduced to what probing needs to know

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine coordinate units (millimeters or inches)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    /// Millimeters (metric)
    #[default]
    MM,
    /// Inches (imperial)
    INCH,
}

impl Units {
    /// All units in selection order
    pub const ALL: [Units; 2] = [Units::MM, Units::INCH];

    /// Selection index (0 = MM, 1 = INCH)
    pub fn index(&self) -> usize {
        match self {
            Units::MM => 0,
            Units::INCH => 1,
        }
    }

    /// Look up units by selection index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
        }
    }
}

/// Work coordinate system selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkCoordinateSystem {
    #[default]
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
}

impl WorkCoordinateSystem {
    /// All systems in selection order
    pub const ALL: [WorkCoordinateSystem; 6] = [
        WorkCoordinateSystem::G54,
        WorkCoordinateSystem::G55,
        WorkCoordinateSystem::G56,
        WorkCoordinateSystem::G57,
        WorkCoordinateSystem::G58,
        WorkCoordinateSystem::G59,
    ];

    /// Selection index (0 = G54 ... 5 = G59)
    pub fn index(&self) -> usize {
        match self {
            Self::G54 => 0,
            Self::G55 => 1,
            Self::G56 => 2,
            Self::G57 => 3,
            Self::G58 => 4,
            Self::G59 => 5,
        }
    }

    /// Look up a system by selection index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for WorkCoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", 54 + self.index())
    }
}

/// Position in 3D space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Position axes must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// The origin
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

/// Machine/Controller state
///
/// Only `Idle` allows a new probe cycle to be started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    /// Not connected to any controller
    #[default]
    Disconnected,
    /// Connected and idle, ready for commands
    Idle,
    /// Executing a G-code program
    Run,
    /// Program paused, awaiting resume
    Hold,
    /// Manual jog/movement mode
    Jog,
    /// Probe cycle in progress
    Probe,
    /// Homing cycle in progress
    Home,
    /// Machine alarm state (requires manual intervention)
    Alarm,
}

impl ControllerState {
    /// Check if the controller is idle and can accept a probe cycle
    pub fn is_idle(&self) -> bool {
        matches!(self, ControllerState::Idle)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Idle => write!(f, "Idle"),
            Self::Run => write!(f, "Run"),
            Self::Hold => write!(f, "Hold"),
            Self::Jog => write!(f, "Jog"),
            Self::Probe => write!(f, "Probe"),
            Self::Home => write!(f, "Home"),
            Self::Alarm => write!(f, "Alarm"),
        }
    }
}
