//! Z touch-plate probe path preview

use glam::Vec3;
use probekit_core::Position;

use super::probe_path::{to_vec3, MovementType, PathSegment};
use super::PreviewId;

/// Preview of a single-axis Z probe onto a touch plate
#[derive(Debug, Clone, PartialEq)]
pub struct ZAxisPreview {
    id: PreviewId,
    label: String,
    /// How far down the probe may travel
    distance: f64,
    /// Touch plate thickness
    offset: f64,
    /// Work position the plunge starts from
    start: Position,
}

impl ZAxisPreview {
    /// Create a preview with zero spacing anchored at the origin
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: PreviewId::new(),
            label: label.into(),
            distance: 0.0,
            offset: 0.0,
            start: Position::zero(),
        }
    }

    pub fn id(&self) -> PreviewId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace probe distance and plate thickness
    pub fn update_spacing(&mut self, distance: f64, offset: f64) {
        self.distance = distance;
        self.offset = offset;
    }

    /// Anchor the plunge at the current work position
    pub fn set_start(&mut self, start: Position) {
        self.start = start;
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Planned path in work coordinates: the plunge, then the plate
    /// thickness measured up from the lowest point of travel.
    pub fn path(&self) -> Vec<PathSegment> {
        let start = to_vec3(&self.start);
        let bottom = start - Vec3::new(0.0, 0.0, self.distance as f32);

        vec![
            PathSegment::new(start, bottom, MovementType::Probe),
            PathSegment::new(
                bottom,
                bottom + Vec3::new(0.0, 0.0, self.offset as f32),
                MovementType::PlateThickness,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_follows_spacing_and_start() {
        let mut preview = ZAxisPreview::new("z");
        preview.update_spacing(10.0, 2.0);
        preview.set_start(Position::new(5.0, 5.0, 20.0));

        let path = preview.path();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].start, Vec3::new(5.0, 5.0, 20.0));
        assert_eq!(path[0].end, Vec3::new(5.0, 5.0, 10.0));
        assert_eq!(path[1].movement, MovementType::PlateThickness);
        assert_eq!(path[1].end, Vec3::new(5.0, 5.0, 12.0));
    }
}
