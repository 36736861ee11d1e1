//! Probe path segments
//!
//! Planned probe paths are drawn as straight segments in work coordinates.
//! Each segment carries the kind of movement it represents so the renderer
//! can style rapids, probing moves and plate markers differently.

use glam::Vec3;
use probekit_core::Position;

/// Movement type of a path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementType {
    /// Rapid positioning move before probing
    Rapid,
    /// Slow probing move toward the surface
    Probe,
    /// Touch plate thickness marker
    PlateThickness,
}

/// A single straight segment of a planned probe path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    /// Segment start
    pub start: Vec3,
    /// Segment end
    pub end: Vec3,
    /// What the movement is
    pub movement: MovementType,
}

impl PathSegment {
    /// Create a segment between two points
    pub fn new(start: Vec3, end: Vec3, movement: MovementType) -> Self {
        Self {
            start,
            end,
            movement,
        }
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Convert a machine position into render space
pub fn to_vec3(position: &Position) -> Vec3 {
    Vec3::new(position.x as f32, position.y as f32, position.z as f32)
}
