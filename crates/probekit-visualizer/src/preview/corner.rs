//! Corner probe path preview
//!
//! Shows where an XYZ, outside-corner or inside-corner probe cycle will
//! travel: a rapid to each approach point, then a probing move along the
//! axis toward the corner. A non-zero Z distance adds the plunge.

use glam::Vec3;
use probekit_core::Position;

use super::probe_path::{to_vec3, MovementType, PathSegment};
use super::PreviewId;

/// Preview of a corner probe cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CornerPreview {
    id: PreviewId,
    label: String,
    /// Per-axis probe distances
    distances: Position,
    /// Per-axis clearance offsets
    offsets: Position,
    /// Probe tip diameter from the last dispatched operation
    probe_diameter: f64,
    /// Work position the cycle starts from
    start_work: Position,
    /// Machine position the cycle starts from
    start_machine: Position,
}

impl CornerPreview {
    /// Create a preview with zero spacing anchored at the origin
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: PreviewId::new(),
            label: label.into(),
            distances: Position::zero(),
            offsets: Position::zero(),
            probe_diameter: 0.0,
            start_work: Position::zero(),
            start_machine: Position::zero(),
        }
    }

    pub fn id(&self) -> PreviewId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the spacing values; unused axes are passed as zero
    pub fn update_spacing(
        &mut self,
        x_distance: f64,
        y_distance: f64,
        z_distance: f64,
        x_offset: f64,
        y_offset: f64,
        z_offset: f64,
    ) {
        self.distances = Position::new(x_distance, y_distance, z_distance);
        self.offsets = Position::new(x_offset, y_offset, z_offset);
    }

    /// Anchor the preview at the position a probe cycle was started from
    pub fn set_context(&mut self, probe_diameter: f64, start_work: Position, start_machine: Position) {
        self.probe_diameter = probe_diameter;
        self.start_work = start_work;
        self.start_machine = start_machine;
    }

    pub fn distances(&self) -> Position {
        self.distances
    }

    pub fn offsets(&self) -> Position {
        self.offsets
    }

    pub fn probe_diameter(&self) -> f64 {
        self.probe_diameter
    }

    pub fn start_work(&self) -> Position {
        self.start_work
    }

    pub fn start_machine(&self) -> Position {
        self.start_machine
    }

    /// Planned path in work coordinates
    pub fn path(&self) -> Vec<PathSegment> {
        let anchor = to_vec3(&self.start_work);
        let distances = to_vec3(&self.distances);
        let offsets = to_vec3(&self.offsets);
        let mut segments = Vec::with_capacity(6);

        // X is probed from a point shifted along Y by the Y offset, and vice versa.
        let x_start = anchor + Vec3::new(0.0, offsets.y, 0.0);
        if distances.x != 0.0 {
            segments.push(PathSegment::new(anchor, x_start, MovementType::Rapid));
            segments.push(PathSegment::new(
                x_start,
                x_start + Vec3::new(distances.x, 0.0, 0.0),
                MovementType::Probe,
            ));
        }

        let y_start = anchor + Vec3::new(offsets.x, 0.0, 0.0);
        if distances.y != 0.0 {
            segments.push(PathSegment::new(anchor, y_start, MovementType::Rapid));
            segments.push(PathSegment::new(
                y_start,
                y_start + Vec3::new(0.0, distances.y, 0.0),
                MovementType::Probe,
            ));
        }

        if distances.z != 0.0 {
            let z_start = anchor + Vec3::new(offsets.x, offsets.y, 0.0);
            segments.push(PathSegment::new(anchor, z_start, MovementType::Rapid));
            segments.push(PathSegment::new(
                z_start,
                z_start - Vec3::new(0.0, 0.0, distances.z),
                MovementType::Probe,
            ));
        }

        segments
    }
}
