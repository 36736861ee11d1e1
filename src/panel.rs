//! Probe panel
//!
//! [`ProbePanel`] is the probe window without the widgets. It owns the
//! parameter model and the mode selector, keeps the path preview in step
//! with them while the panel is open, gates edits on the machine state,
//! and hands finished descriptors to the probing engine.

use probekit_core::{
    Error, MachineEvent, MachineStateProvider, ParameterError, ProbeError, Result, SharedMachineState,
    Units, WorkCoordinateSystem,
};
use probekit_probe::{
    submit, DescriptorBuilder, FieldKey, Mode, ModeSelector, ParameterModel, PreviewCoordinator,
    ProbeEngine, ProbeOperationDescriptor,
};
use probekit_settings::{PanelConfig, SettingsError, SettingsResult, SettingsSnapshot, SettingsStore};
use probekit_visualizer::VisualizationPipeline;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Toolkit-independent probe window
pub struct ProbePanel<E: ProbeEngine> {
    model: Rc<ParameterModel>,
    selector: Rc<ModeSelector>,
    coordinator: Rc<RefCell<PreviewCoordinator>>,
    machine: Arc<dyn MachineStateProvider + Send + Sync>,
    events: Option<broadcast::Receiver<MachineEvent>>,
    engine: E,
    config: PanelConfig,
    store: Option<SettingsStore>,
    open: Rc<Cell<bool>>,
    controls_enabled: bool,
}

impl<E: ProbeEngine> ProbePanel<E> {
    /// Create a closed panel with default parameters
    pub fn new(
        pipeline: Rc<RefCell<dyn VisualizationPipeline>>,
        machine: Arc<dyn MachineStateProvider + Send + Sync>,
        engine: E,
        config: PanelConfig,
    ) -> Self {
        let model = Rc::new(ParameterModel::new());
        let selector = Rc::new(ModeSelector::default());
        let coordinator = Rc::new(RefCell::new(PreviewCoordinator::new(pipeline)));
        let open = Rc::new(Cell::new(false));

        {
            let (coordinator, model, open) = (coordinator.clone(), model.clone(), open.clone());
            selector.on_mode_changed(move |previous, next| {
                if open.get() {
                    coordinator
                        .borrow_mut()
                        .on_mode_changed(previous, next, model.as_ref());
                }
            });
        }
        {
            let (coordinator, open) = (coordinator.clone(), open.clone());
            model.on_change(move |_, values| {
                if open.get() {
                    coordinator.borrow_mut().on_parameters_changed(values);
                }
            });
        }

        let store = match config.resolved_settings_file() {
            Ok(path) => Some(SettingsStore::new(path)),
            Err(e) => {
                tracing::warn!("Probe settings will not be persisted: {}", e);
                None
            }
        };

        Self {
            model,
            selector,
            coordinator,
            machine,
            events: None,
            engine,
            config,
            store,
            open,
            controls_enabled: true,
        }
    }

    /// Create a panel that follows a [`SharedMachineState`]
    pub fn with_shared_machine(
        pipeline: Rc<RefCell<dyn VisualizationPipeline>>,
        machine: &SharedMachineState,
        engine: E,
        config: PanelConfig,
    ) -> Self {
        let mut panel = Self::new(pipeline, Arc::new(machine.clone()), engine, config);
        panel.listen_to_machine(machine.subscribe());
        panel
    }

    /// Follow machine state changes from `events`
    pub fn listen_to_machine(&mut self, events: broadcast::Receiver<MachineEvent>) {
        self.events = Some(events);
        self.sync_controls();
    }

    /// Show the panel: restore saved settings and register the preview
    pub fn open(&mut self) {
        if self.open.get() {
            return;
        }

        if let Err(e) = self.load_settings() {
            tracing::warn!("Keeping current probe settings: {}", e);
        }

        self.open.set(true);
        self.coordinator
            .borrow_mut()
            .on_component_opened(self.selector.current(), self.model.as_ref());
        self.sync_controls();
        tracing::info!("Probe panel opened in {} mode", self.selector.current());
    }

    /// Hide the panel: remove the preview and save settings if configured
    pub fn close(&mut self) {
        if !self.open.get() {
            return;
        }

        self.coordinator.borrow_mut().on_component_closed();
        self.open.set(false);

        if self.config.autosave_on_close {
            if let Err(e) = self.save_settings() {
                tracing::warn!("Failed to save probe settings: {}", e);
            }
        }
        tracing::info!("Probe panel closed");
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Edit a numeric field
    pub fn set_field(&mut self, key: FieldKey, value: f64) -> Result<()> {
        self.check_controls()?;
        self.model.set(key, value).map_err(Error::from)
    }

    pub fn set_units(&mut self, units: Units) -> Result<()> {
        self.check_controls()?;
        self.model.set_units(units);
        Ok(())
    }

    pub fn set_work_coordinate_system(&mut self, wcs: WorkCoordinateSystem) -> Result<()> {
        self.check_controls()?;
        self.model.set_work_coordinate_system(wcs);
        Ok(())
    }

    /// Switch tabs. Always allowed, even while the machine is busy.
    pub fn select_mode(&mut self, mode: Mode) -> bool {
        self.selector.select(mode)
    }

    pub fn mode(&self) -> Mode {
        self.selector.current()
    }

    /// Start a probe cycle for the selected mode
    ///
    /// # Errors
    /// [`ProbeError::MachineNotIdle`] while the machine is busy and
    /// [`ProbeError::InvalidMode`] on the settings tab.
    pub fn probe(&mut self) -> Result<ProbeOperationDescriptor> {
        if !self.machine.is_idle() {
            let state = self.machine.controller_state();
            tracing::warn!("Probe request ignored, machine is {}", state);
            return Err(ProbeError::MachineNotIdle {
                state: state.to_string(),
            }
            .into());
        }

        let mode = self.selector.current();
        let descriptor = DescriptorBuilder::build(mode, self.model.as_ref(), self.machine.as_ref())?;

        self.coordinator
            .borrow_mut()
            .seed(mode, &descriptor, self.machine.work_position());
        submit(&mut self.engine, mode, &descriptor)?;
        Ok(descriptor)
    }

    /// Apply pending machine events. Returns how many were handled.
    pub fn pump_machine_events(&mut self) -> usize {
        let mut handled = 0;
        let mut resync = false;
        let mut closed = false;

        if let Some(events) = self.events.as_mut() {
            loop {
                match events.try_recv() {
                    Ok(MachineEvent::StateChanged { current, .. }) => {
                        tracing::debug!("Probe panel sees machine {}", current);
                        resync = true;
                        handled += 1;
                    }
                    Ok(MachineEvent::PositionChanged { .. }) => handled += 1,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!("Missed {} machine events", skipped);
                        resync = true;
                    }
                    Err(TryRecvError::Closed) => {
                        tracing::debug!("Machine event channel closed");
                        closed = true;
                        resync = true;
                        break;
                    }
                }
            }
        }

        if closed {
            self.events = None;
        }
        if resync {
            self.sync_controls();
        }
        handled
    }

    /// Whether field edits and probe triggers are enabled
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn capture_settings(&self) -> SettingsSnapshot {
        SettingsSnapshot::capture(&self.model, &self.selector)
    }

    /// Apply a snapshot; on error nothing changes
    pub fn restore_settings(&mut self, snapshot: &SettingsSnapshot) -> SettingsResult<()> {
        let (values, mode) = snapshot.restore(&self.model.values(), self.selector.current())?;
        self.model
            .replace_all(values)
            .map_err(|e: ParameterError| SettingsError::CorruptSnapshot(e.to_string()))?;
        self.selector.select(mode);
        Ok(())
    }

    /// Restore from the settings file. Returns `false` if nothing was saved.
    pub fn load_settings(&mut self) -> SettingsResult<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(snapshot) = store.load_snapshot()? else {
            return Ok(false);
        };
        self.restore_settings(&snapshot)?;
        tracing::info!("Restored probe settings");
        Ok(true)
    }

    /// Write the current settings to the settings file
    pub fn save_settings(&self) -> SettingsResult<()> {
        match &self.store {
            Some(store) => store.save_snapshot(&self.capture_settings()),
            None => Err(SettingsError::ConfigDirectory(
                "no settings file configured".to_string(),
            )),
        }
    }

    pub fn model(&self) -> &ParameterModel {
        &self.model
    }

    pub fn coordinator(&self) -> Rc<RefCell<PreviewCoordinator>> {
        self.coordinator.clone()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn sync_controls(&mut self) {
        let enabled = !self.config.disable_controls_when_busy || self.machine.is_idle();
        if enabled != self.controls_enabled {
            tracing::debug!(
                "Probe controls {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        self.controls_enabled = enabled;
    }

    fn check_controls(&self) -> Result<()> {
        if self.controls_enabled {
            Ok(())
        } else {
            Err(ProbeError::MachineNotIdle {
                state: self.machine.controller_state().to_string(),
            }
            .into())
        }
    }
}
