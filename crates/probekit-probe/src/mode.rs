//! Probing modes and the mode selector
//!
//! The panel shows one mode at a time. Each mode maps to a fixed set of
//! fields, a preview kind and a probing engine entry point; `Settings`
//! edits the shared fields only and cannot probe.

use probekit_visualizer::PreviewKind;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::engine::ProbeFamily;
use crate::model::{ListenerId, MAX_NOTIFY_PASSES};
use crate::parameters::FieldKey;

/// Probing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Corner probe of X, Y and Z in one cycle
    #[default]
    Xyz,
    /// Outside corner probe of X and Y
    OutsideCorner,
    /// Single-axis Z touch plate probe
    ZTouch,
    /// Shared probe settings, not a probe operation
    Settings,
    /// Inside corner probe of X and Y
    InsideCorner,
}

impl Mode {
    /// All modes in persisted index order
    pub const ALL: [Mode; 5] = [
        Mode::Xyz,
        Mode::OutsideCorner,
        Mode::ZTouch,
        Mode::Settings,
        Mode::InsideCorner,
    ];

    /// Persisted selection index
    pub fn index(&self) -> usize {
        match self {
            Mode::Xyz => 0,
            Mode::OutsideCorner => 1,
            Mode::ZTouch => 2,
            Mode::Settings => 3,
            Mode::InsideCorner => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether a probe operation can be built in this mode
    pub fn is_operational(&self) -> bool {
        !matches!(self, Mode::Settings)
    }

    /// Fields edited on this mode's panel
    pub fn field_keys(&self) -> &'static [FieldKey] {
        match self {
            Mode::Xyz => &[
                FieldKey::XyzXDistance,
                FieldKey::XyzYDistance,
                FieldKey::XyzZDistance,
                FieldKey::XyzXOffset,
                FieldKey::XyzYOffset,
                FieldKey::XyzZOffset,
            ],
            Mode::OutsideCorner => &[
                FieldKey::OutsideXDistance,
                FieldKey::OutsideYDistance,
                FieldKey::OutsideXOffset,
                FieldKey::OutsideYOffset,
            ],
            Mode::ZTouch => &[FieldKey::ZDistance, FieldKey::ZOffset],
            Mode::Settings => &FieldKey::SHARED,
            Mode::InsideCorner => &[
                FieldKey::InsideXDistance,
                FieldKey::InsideYDistance,
                FieldKey::InsideXOffset,
                FieldKey::InsideYOffset,
            ],
        }
    }

    /// Preview drawn while this mode is selected
    pub fn preview_kind(&self) -> Option<PreviewKind> {
        match self {
            Mode::Xyz | Mode::OutsideCorner | Mode::InsideCorner => Some(PreviewKind::Corner),
            Mode::ZTouch => Some(PreviewKind::ZAxis),
            Mode::Settings => None,
        }
    }

    /// Probing engine entry point for this mode
    pub fn family(&self) -> Option<ProbeFamily> {
        match self {
            Mode::Xyz => Some(ProbeFamily::Xyz),
            Mode::OutsideCorner => Some(ProbeFamily::OutsideCorner),
            Mode::InsideCorner => Some(ProbeFamily::InsideCorner),
            Mode::ZTouch => Some(ProbeFamily::SingleAxis),
            Mode::Settings => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Xyz => write!(f, "XYZ"),
            Mode::OutsideCorner => write!(f, "Outside Corner"),
            Mode::ZTouch => write!(f, "Z"),
            Mode::Settings => write!(f, "Settings"),
            Mode::InsideCorner => write!(f, "Inside Corner"),
        }
    }
}

/// Callback receiving `(previous, next)` on a mode change
pub type ModeListener = Rc<dyn Fn(Mode, Mode)>;

/// Tracks the active mode and notifies on changes
pub struct ModeSelector {
    current: Cell<Mode>,
    listeners: RefCell<Vec<(ListenerId, ModeListener)>>,
    next_listener_id: Cell<u64>,
    notifying: Cell<bool>,
}

impl ModeSelector {
    pub fn new(initial: Mode) -> Self {
        Self {
            current: Cell::new(initial),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            notifying: Cell::new(false),
        }
    }

    pub fn current(&self) -> Mode {
        self.current.get()
    }

    /// Select a mode. Returns `false` if it was already active.
    ///
    /// A selection made from inside a mode listener takes effect at once and
    /// is announced in a follow-up pass, from the mode the pass announced to
    /// the mode current at its end.
    pub fn select(&self, mode: Mode) -> bool {
        let previous = self.current.get();
        if previous == mode {
            return false;
        }
        self.current.set(mode);
        tracing::debug!("Probe mode {} -> {}", previous, mode);

        if self.notifying.get() {
            tracing::debug!("Mode {} selected from a mode listener, deferred", mode);
            return true;
        }

        self.notifying.set(true);
        let (mut from, mut to) = (previous, mode);
        let mut passes = 0;
        loop {
            passes += 1;
            let listeners: Vec<ModeListener> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(from, to);
            }

            let current = self.current.get();
            if current == to {
                break;
            }
            if passes == MAX_NOTIFY_PASSES {
                tracing::warn!(
                    "Mode listeners still switching after {} passes, {} not announced",
                    passes,
                    current
                );
                break;
            }
            (from, to) = (to, current);
        }
        self.notifying.set(false);
        true
    }

    /// Register a callback fired after every mode change
    pub fn on_mode_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(Mode, Mode) + 'static,
    {
        let id = ListenerId::new(self.next_listener_id.get());
        self.next_listener_id.set(id.value() + 1);
        self.listeners.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(Mode::from_index(5), None);
    }

    #[test]
    fn test_field_sets_are_disjoint() {
        for a in Mode::ALL {
            for b in Mode::ALL {
                if a == b {
                    continue;
                }
                for key in a.field_keys() {
                    assert!(!b.field_keys().contains(key), "{} shared by {} and {}", key, a, b);
                }
            }
        }
    }

    #[test]
    fn test_field_keys_match_ownership() {
        for mode in Mode::ALL {
            for key in mode.field_keys() {
                let owner = key.mode();
                assert!(owner == Some(mode) || (owner.is_none() && mode == Mode::Settings));
            }
        }
    }

    #[test]
    fn test_select_same_mode_is_noop() {
        let selector = ModeSelector::new(Mode::OutsideCorner);
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        selector.on_mode_changed(move |_, _| counter.set(counter.get() + 1));

        assert!(!selector.select(Mode::OutsideCorner));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_select_fires_once_with_previous_and_next() {
        let selector = ModeSelector::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        selector.on_mode_changed(move |previous, next| {
            log.borrow_mut().push((previous, next));
        });

        assert!(selector.select(Mode::ZTouch));
        assert_eq!(selector.current(), Mode::ZTouch);
        assert_eq!(*seen.borrow(), vec![(Mode::Xyz, Mode::ZTouch)]);
    }

    #[test]
    fn test_listener_sees_updated_state() {
        let selector = Rc::new(ModeSelector::default());
        let observed = Rc::new(Cell::new(Mode::Xyz));
        let (sel, obs) = (selector.clone(), observed.clone());
        selector.on_mode_changed(move |_, _| obs.set(sel.current()));

        selector.select(Mode::Settings);
        assert_eq!(observed.get(), Mode::Settings);
    }

    #[test]
    fn test_redirect_is_announced_to_later_listeners() {
        let selector = Rc::new(ModeSelector::default());
        let sel = selector.clone();
        selector.on_mode_changed(move |_, next| {
            if next == Mode::ZTouch {
                sel.select(Mode::Settings);
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        selector.on_mode_changed(move |previous, next| log.borrow_mut().push((previous, next)));

        assert!(selector.select(Mode::ZTouch));
        assert_eq!(selector.current(), Mode::Settings);
        assert_eq!(
            *seen.borrow(),
            vec![(Mode::Xyz, Mode::ZTouch), (Mode::ZTouch, Mode::Settings)]
        );
    }

    #[test]
    fn test_redirect_back_needs_no_follow_up() {
        let selector = Rc::new(ModeSelector::default());
        let fired = Rc::new(Cell::new(0));
        let (sel, counter) = (selector.clone(), fired.clone());
        selector.on_mode_changed(move |_, _| {
            counter.set(counter.get() + 1);
            sel.select(Mode::Xyz);
            sel.select(Mode::ZTouch);
        });

        selector.select(Mode::ZTouch);
        assert_eq!(fired.get(), 1);
        assert_eq!(selector.current(), Mode::ZTouch);
    }

    #[test]
    fn test_bouncing_listener_is_capped() {
        let selector = Rc::new(ModeSelector::default());
        let fired = Rc::new(Cell::new(0));
        let (sel, counter) = (selector.clone(), fired.clone());
        selector.on_mode_changed(move |_, next| {
            counter.set(counter.get() + 1);
            let bounce = if next == Mode::ZTouch { Mode::Xyz } else { Mode::ZTouch };
            sel.select(bounce);
        });

        selector.select(Mode::ZTouch);
        assert_eq!(fired.get(), MAX_NOTIFY_PASSES);

        // The guard is released afterwards.
        let before = fired.get();
        selector.select(Mode::Settings);
        assert!(fired.get() > before);
    }

    #[test]
    fn test_remove_listener() {
        let selector = ModeSelector::default();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let id = selector.on_mode_changed(move |_, _| counter.set(counter.get() + 1));

        assert!(selector.remove_listener(id));
        assert!(!selector.remove_listener(id));
        selector.select(Mode::ZTouch);
        assert_eq!(fired.get(), 0);
    }
}
