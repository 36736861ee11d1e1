//! # ProbeKit Visualizer
//!
//! Probe path preview geometry and the registration interface of the
//! visualization pipeline.

pub mod preview;
pub mod registry;

pub use preview::{
    CornerPreview, MovementType, PathSegment, PreviewGeometry, PreviewId, PreviewKind,
    SharedPreview, ZAxisPreview,
};
pub use registry::{RenderableRegistry, VisualizationPipeline};
