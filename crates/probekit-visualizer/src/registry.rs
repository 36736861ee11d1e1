//! Visualization pipeline registry
//!
//! The pipeline draws whatever renderables are registered with it. Identity
//! is the geometry's [`PreviewId`]: registering an already registered
//! preview and deregistering one that is not registered are both no-ops.

use crate::preview::{PathSegment, PreviewId, SharedPreview};

/// Registration interface of the visualization pipeline
pub trait VisualizationPipeline {
    /// Start drawing a geometry. No-op if it is already registered.
    fn register(&mut self, geometry: SharedPreview);

    /// Stop drawing a geometry. No-op if it is not registered.
    fn deregister(&mut self, id: PreviewId);

    /// Whether a geometry is currently drawn
    fn is_registered(&self, id: PreviewId) -> bool;
}

/// In-memory pipeline that keeps registered previews in registration order
#[derive(Default)]
pub struct RenderableRegistry {
    renderables: Vec<(PreviewId, SharedPreview)>,
    registrations: usize,
    deregistrations: usize,
}

impl RenderableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered renderables
    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    /// IDs of registered renderables, in registration order
    pub fn ids(&self) -> Vec<PreviewId> {
        self.renderables.iter().map(|(id, _)| *id).collect()
    }

    /// Registered renderable by ID
    pub fn get(&self, id: PreviewId) -> Option<SharedPreview> {
        self.renderables
            .iter()
            .find(|(rid, _)| *rid == id)
            .map(|(_, geometry)| geometry.clone())
    }

    /// Number of effective registrations since creation
    pub fn registration_count(&self) -> usize {
        self.registrations
    }

    /// Number of effective deregistrations since creation
    pub fn deregistration_count(&self) -> usize {
        self.deregistrations
    }

    /// Collect the paths of every registered renderable for drawing
    pub fn render(&self) -> Vec<PathSegment> {
        self.renderables
            .iter()
            .flat_map(|(_, geometry)| geometry.borrow().path())
            .collect()
    }
}

impl VisualizationPipeline for RenderableRegistry {
    fn register(&mut self, geometry: SharedPreview) {
        let id = geometry.borrow().id();
        if self.is_registered(id) {
            tracing::debug!("{} already registered", id);
            return;
        }
        tracing::debug!("Registering {}", id);
        self.renderables.push((id, geometry));
        self.registrations += 1;
    }

    fn deregister(&mut self, id: PreviewId) {
        let before = self.renderables.len();
        self.renderables.retain(|(rid, _)| *rid != id);
        if self.renderables.len() == before {
            tracing::debug!("{} not registered, nothing to remove", id);
            return;
        }
        tracing::debug!("Deregistered {}", id);
        self.deregistrations += 1;
    }

    fn is_registered(&self, id: PreviewId) -> bool {
        self.renderables.iter().any(|(rid, _)| *rid == id)
    }
}
