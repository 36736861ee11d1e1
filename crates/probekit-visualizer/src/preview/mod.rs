//! Probe path previews
//!
//! A preview is a renderable owned by the probe panel and handed to the
//! visualization pipeline. Its identity ([`PreviewId`]) is fixed at creation
//! and survives spacing updates, so the pipeline can keep drawing the same
//! object while its values change underneath it.

pub mod corner;
pub mod probe_path;
pub mod z_axis;

pub use corner::CornerPreview;
pub use probe_path::{MovementType, PathSegment};
pub use z_axis::ZAxisPreview;

use probekit_core::Shared;
use uuid::Uuid;

/// Identity of a preview geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(Uuid);

impl PreviewId {
    /// Create a new unique preview ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PreviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Preview({})", &self.0.to_string()[..8])
    }
}

/// Which preview variant a geometry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewKind {
    /// Corner probe (XYZ, outside, inside)
    Corner,
    /// Z touch plate probe
    ZAxis,
}

/// A planned probe path that can be registered for drawing
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewGeometry {
    Corner(CornerPreview),
    ZAxis(ZAxisPreview),
}

impl PreviewGeometry {
    pub fn id(&self) -> PreviewId {
        match self {
            PreviewGeometry::Corner(p) => p.id(),
            PreviewGeometry::ZAxis(p) => p.id(),
        }
    }

    pub fn kind(&self) -> PreviewKind {
        match self {
            PreviewGeometry::Corner(_) => PreviewKind::Corner,
            PreviewGeometry::ZAxis(_) => PreviewKind::ZAxis,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PreviewGeometry::Corner(p) => p.label(),
            PreviewGeometry::ZAxis(p) => p.label(),
        }
    }

    /// Planned path in work coordinates
    pub fn path(&self) -> Vec<PathSegment> {
        match self {
            PreviewGeometry::Corner(p) => p.path(),
            PreviewGeometry::ZAxis(p) => p.path(),
        }
    }

    pub fn as_corner_mut(&mut self) -> Option<&mut CornerPreview> {
        match self {
            PreviewGeometry::Corner(p) => Some(p),
            PreviewGeometry::ZAxis(_) => None,
        }
    }

    pub fn as_z_axis_mut(&mut self) -> Option<&mut ZAxisPreview> {
        match self {
            PreviewGeometry::ZAxis(p) => Some(p),
            PreviewGeometry::Corner(_) => None,
        }
    }
}

impl From<CornerPreview> for PreviewGeometry {
    fn from(preview: CornerPreview) -> Self {
        PreviewGeometry::Corner(preview)
    }
}

impl From<ZAxisPreview> for PreviewGeometry {
    fn from(preview: ZAxisPreview) -> Self {
        PreviewGeometry::ZAxis(preview)
    }
}

/// A preview shared between its owner and the visualization pipeline
pub type SharedPreview = Shared<PreviewGeometry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = CornerPreview::new("a");
        let b = CornerPreview::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_geometry_dispatch() {
        let corner: PreviewGeometry = CornerPreview::new("corner").into();
        let mut z: PreviewGeometry = ZAxisPreview::new("z").into();

        assert_eq!(corner.kind(), PreviewKind::Corner);
        assert_eq!(z.kind(), PreviewKind::ZAxis);
        assert_eq!(z.label(), "z");
        assert!(z.as_corner_mut().is_none());
        assert!(z.as_z_axis_mut().is_some());
    }
}
