use anyhow::Context;
use probekit::{
    init_logging, ControllerState, FieldKey, LoggingEngine, Mode, PanelConfig, Position, ProbePanel,
    RenderableRegistry, SharedMachineState, BUILD_DATE, VERSION,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Headless probe session: opens the panel, probes once in every mode
/// against a simulated idle machine and reports the previewed paths.
fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("ProbeKit {} (built {})", VERSION, BUILD_DATE);

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => PanelConfig::load_from_file(&path)
            .with_context(|| format!("loading panel config {}", path.display()))?,
        // Keep the demo away from the user's saved settings.
        None => PanelConfig::read_only(std::env::temp_dir().join("probekit-demo").join("probe.toml")),
    };

    let machine = SharedMachineState::new();
    machine.set_state(ControllerState::Idle);
    machine.set_positions(Position::new(-150.0, -100.0, -20.0), Position::new(0.0, 0.0, 5.0));

    let registry = Rc::new(RefCell::new(RenderableRegistry::new()));
    let mut panel = ProbePanel::with_shared_machine(
        registry.clone(),
        &machine,
        LoggingEngine::new(),
        config,
    );

    panel.open();
    panel.pump_machine_events();
    panel.set_field(FieldKey::ProbeDiameter, 3.175)?;

    for mode in [Mode::Xyz, Mode::OutsideCorner, Mode::InsideCorner, Mode::ZTouch] {
        panel.select_mode(mode);
        let descriptor = panel.probe()?;
        tracing::info!(
            "{}: {} preview segments, start {}",
            mode,
            registry.borrow().render().len(),
            descriptor.start_position()
        );
    }

    panel.close();
    tracing::info!("{} probe requests submitted", panel.engine().history().len());
    Ok(())
}
