//! Preview coordination
//!
//! Keeps the visualization pipeline showing exactly the preview that
//! matches the selected mode, with spacing that follows the parameter
//! fields. The coordinator owns one corner preview and one Z preview for
//! its whole life; switching modes registers and deregisters those two
//! objects and never creates new ones.
//!
//! At most one of them is registered at any time.

use probekit_core::Position;
use probekit_visualizer::{
    CornerPreview, PreviewGeometry, PreviewId, PreviewKind, SharedPreview, VisualizationPipeline,
    ZAxisPreview,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::descriptor::ProbeOperationDescriptor;
use crate::mode::Mode;
use crate::parameters::{FieldKey, FieldSource};

/// Registers and updates the preview for the selected mode
pub struct PreviewCoordinator {
    pipeline: Rc<RefCell<dyn VisualizationPipeline>>,
    corner: SharedPreview,
    z_axis: SharedPreview,
    mode: Mode,
    active: Option<PreviewKind>,
}

impl PreviewCoordinator {
    pub fn new(pipeline: Rc<RefCell<dyn VisualizationPipeline>>) -> Self {
        Self {
            pipeline,
            corner: probekit_core::shared(PreviewGeometry::from(CornerPreview::new("Probe corner"))),
            z_axis: probekit_core::shared(PreviewGeometry::from(ZAxisPreview::new("Probe Z"))),
            mode: Mode::default(),
            active: None,
        }
    }

    /// The panel became visible: register the preview for `mode`
    pub fn on_component_opened<F>(&mut self, mode: Mode, fields: &F)
    where
        F: FieldSource + ?Sized,
    {
        tracing::debug!("Probe panel opened in {} mode", mode);
        self.switch_to(mode, fields);
    }

    /// The selected mode changed
    ///
    /// When both modes use the same preview kind it stays registered and
    /// only its spacing is updated.
    pub fn on_mode_changed<F>(&mut self, previous: Mode, next: Mode, fields: &F)
    where
        F: FieldSource + ?Sized,
    {
        tracing::debug!("Preview follows mode {} -> {}", previous, next);
        self.switch_to(next, fields);
    }

    /// A parameter changed: refresh the spacing of the active preview
    pub fn on_parameters_changed<F>(&mut self, fields: &F)
    where
        F: FieldSource + ?Sized,
    {
        if self.active.is_some() {
            self.refresh_spacing(fields);
        }
    }

    /// The panel was hidden: nothing stays registered
    pub fn on_component_closed(&mut self) {
        let mut pipeline = self.pipeline.borrow_mut();
        pipeline.deregister(self.corner.borrow().id());
        pipeline.deregister(self.z_axis.borrow().id());
        self.active = None;
        tracing::debug!("Probe panel closed, previews removed");
    }

    /// Anchor the previews at the start of a dispatched operation
    pub fn seed(&mut self, mode: Mode, descriptor: &ProbeOperationDescriptor, work_position: Position) {
        match mode.preview_kind() {
            Some(PreviewKind::Corner) => {
                if let Some(corner) = self.corner.borrow_mut().as_corner_mut() {
                    corner.set_context(
                        descriptor.probe_diameter(),
                        work_position,
                        descriptor.start_position(),
                    );
                }
            }
            Some(PreviewKind::ZAxis) => {
                if let Some(z_axis) = self.z_axis.borrow_mut().as_z_axis_mut() {
                    z_axis.set_start(work_position);
                }
            }
            None => {}
        }
    }

    /// Kind of the registered preview, if any
    pub fn active_kind(&self) -> Option<PreviewKind> {
        self.active
    }

    /// ID of the registered preview, if any
    pub fn active_id(&self) -> Option<PreviewId> {
        self.active.map(|kind| self.preview(kind).borrow().id())
    }

    /// Mode the previews currently follow
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn corner(&self) -> SharedPreview {
        self.corner.clone()
    }

    pub fn z_axis(&self) -> SharedPreview {
        self.z_axis.clone()
    }

    fn preview(&self, kind: PreviewKind) -> &SharedPreview {
        match kind {
            PreviewKind::Corner => &self.corner,
            PreviewKind::ZAxis => &self.z_axis,
        }
    }

    fn switch_to<F>(&mut self, mode: Mode, fields: &F)
    where
        F: FieldSource + ?Sized,
    {
        self.mode = mode;
        let target = mode.preview_kind();

        if target != self.active {
            // Deregister first so two previews are never registered together.
            if let Some(kind) = self.active.take() {
                let id = self.preview(kind).borrow().id();
                self.pipeline.borrow_mut().deregister(id);
            }
            if let Some(kind) = target {
                let preview = self.preview(kind).clone();
                self.pipeline.borrow_mut().register(preview);
                self.active = Some(kind);
            }
        }

        if self.active.is_some() {
            self.refresh_spacing(fields);
        }
    }

    fn refresh_spacing<F>(&mut self, fields: &F)
    where
        F: FieldSource + ?Sized,
    {
        match self.mode {
            Mode::Xyz => self.update_corner(
                fields,
                [
                    FieldKey::XyzXDistance,
                    FieldKey::XyzYDistance,
                    FieldKey::XyzZDistance,
                    FieldKey::XyzXOffset,
                    FieldKey::XyzYOffset,
                    FieldKey::XyzZOffset,
                ],
            ),
            Mode::OutsideCorner => self.update_corner_xy(
                fields,
                [
                    FieldKey::OutsideXDistance,
                    FieldKey::OutsideYDistance,
                    FieldKey::OutsideXOffset,
                    FieldKey::OutsideYOffset,
                ],
            ),
            Mode::InsideCorner => self.update_corner_xy(
                fields,
                [
                    FieldKey::InsideXDistance,
                    FieldKey::InsideYDistance,
                    FieldKey::InsideXOffset,
                    FieldKey::InsideYOffset,
                ],
            ),
            Mode::ZTouch => {
                if let Some(z_axis) = self.z_axis.borrow_mut().as_z_axis_mut() {
                    z_axis.update_spacing(
                        fields.field(FieldKey::ZDistance),
                        fields.field(FieldKey::ZOffset),
                    );
                }
            }
            Mode::Settings => {}
        }
    }

    fn update_corner<F>(&self, fields: &F, keys: [FieldKey; 6])
    where
        F: FieldSource + ?Sized,
    {
        let [xd, yd, zd, xo, yo, zo] = keys.map(|key| fields.field(key));
        if let Some(corner) = self.corner.borrow_mut().as_corner_mut() {
            corner.update_spacing(xd, yd, zd, xo, yo, zo);
        }
    }

    fn update_corner_xy<F>(&self, fields: &F, keys: [FieldKey; 4])
    where
        F: FieldSource + ?Sized,
    {
        let [xd, yd, xo, yo] = keys.map(|key| fields.field(key));
        if let Some(corner) = self.corner.borrow_mut().as_corner_mut() {
            corner.update_spacing(xd, yd, 0.0, xo, yo, 0.0);
        }
    }
}
