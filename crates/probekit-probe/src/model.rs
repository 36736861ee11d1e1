//! Parameter model
//!
//! Holds the live probe parameters for every mode and tells registered
//! listeners about each accepted change. Listeners run synchronously, in
//! registration order, after the new value is stored.
//!
//! The model is meant to be shared on the control thread (`Rc`), so all
//! operations take `&self`. A listener may read the model or even write to
//! it. A write made while listeners are running is stored at once and
//! announced in one follow-up pass once the current pass ends, so every
//! listener ends up seeing the final values. Listeners that keep writing
//! are cut off after [`MAX_NOTIFY_PASSES`] passes.

use probekit_core::{ParameterError, Units, WorkCoordinateSystem};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::parameters::{FieldKey, FieldSource, ParameterValues};

/// Upper bound on notification passes triggered by a single write
pub const MAX_NOTIFY_PASSES: usize = 8;

/// Handle of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub(crate) fn value(&self) -> u64 {
        self.0
    }
}

/// What changed in the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterChange {
    /// A numeric field was set
    Field { key: FieldKey, value: f64 },
    /// Measurement units were selected
    Units(Units),
    /// Target work coordinate system was selected
    WorkCoordinateSystem(WorkCoordinateSystem),
    /// Several values changed at once (settings restore, or writes made by
    /// listeners during one pass)
    Restored,
}

/// Callback receiving the change and the values after it
pub type ParameterListener = Rc<dyn Fn(&ParameterChange, &ParameterValues)>;

/// Live probe parameters with change notification
pub struct ParameterModel {
    values: Cell<ParameterValues>,
    listeners: RefCell<Vec<(ListenerId, ParameterListener)>>,
    next_listener_id: Cell<u64>,
    notifying: Cell<bool>,
    pending: Cell<Option<ParameterChange>>,
}

impl ParameterModel {
    /// Model with every field at its default
    pub fn new() -> Self {
        Self::with_values(ParameterValues::default())
    }

    pub fn with_values(values: ParameterValues) -> Self {
        Self {
            values: Cell::new(values),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            notifying: Cell::new(false),
            pending: Cell::new(None),
        }
    }

    pub fn get(&self, key: FieldKey) -> f64 {
        self.values.get().get(key)
    }

    /// Copy of every current value
    pub fn values(&self) -> ParameterValues {
        self.values.get()
    }

    /// Set a field. Out-of-range values are rejected and the field keeps
    /// its prior value.
    pub fn set(&self, key: FieldKey, value: f64) -> Result<(), ParameterError> {
        let mut values = self.values.get();
        if let Err(e) = values.set(key, value) {
            tracing::debug!("Rejected {} = {}: {}", key, value, e);
            return Err(e);
        }
        self.values.set(values);
        self.notify(ParameterChange::Field { key, value });
        Ok(())
    }

    pub fn units(&self) -> Units {
        self.values.get().units()
    }

    pub fn set_units(&self, units: Units) {
        let mut values = self.values.get();
        values.set_units(units);
        self.values.set(values);
        self.notify(ParameterChange::Units(units));
    }

    pub fn work_coordinate_system(&self) -> WorkCoordinateSystem {
        self.values.get().work_coordinate_system()
    }

    pub fn set_work_coordinate_system(&self, wcs: WorkCoordinateSystem) {
        let mut values = self.values.get();
        values.set_work_coordinate_system(wcs);
        self.values.set(values);
        self.notify(ParameterChange::WorkCoordinateSystem(wcs));
    }

    /// Replace every value at once, with a single notification.
    ///
    /// All fields are checked first; if any is out of bounds nothing is
    /// changed.
    pub fn replace_all(&self, values: ParameterValues) -> Result<(), ParameterError> {
        for (key, value) in values.iter() {
            key.validate(value)?;
        }
        self.values.set(values);
        self.notify(ParameterChange::Restored);
        Ok(())
    }

    /// Register a callback fired after every accepted change
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ParameterChange, &ParameterValues) + 'static,
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

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self, change: ParameterChange) {
        if self.notifying.get() {
            tracing::debug!("{:?} made from a change listener, deferred", change);
            let pending = match self.pending.get() {
                Some(earlier) if earlier != change => ParameterChange::Restored,
                _ => change,
            };
            self.pending.set(Some(pending));
            return;
        }

        self.notifying.set(true);
        let mut change = change;
        let mut passes = 0;
        loop {
            passes += 1;

            // Listeners may register or remove listeners while running.
            let listeners: Vec<ParameterListener> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(&change, &self.values.get());
            }

            let Some(next) = self.pending.take() else {
                break;
            };
            if passes == MAX_NOTIFY_PASSES {
                tracing::warn!(
                    "Change listeners still writing after {} passes, dropping {:?}",
                    passes,
                    next
                );
                break;
            }
            change = next;
        }
        self.notifying.set(false);
    }
}

impl Default for ParameterModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSource for ParameterModel {
    fn field(&self, key: FieldKey) -> f64 {
        self.get(key)
    }

    fn units(&self) -> Units {
        ParameterModel::units(self)
    }

    fn work_coordinate_system(&self) -> WorkCoordinateSystem {
        ParameterModel::work_coordinate_system(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let model = ParameterModel::new();
        model.set(FieldKey::OutsideXDistance, 12.5).unwrap();
        assert_eq!(model.get(FieldKey::OutsideXDistance), 12.5);
    }

    #[test]
    fn test_out_of_range_is_rejected_without_notification() {
        let model = ParameterModel::new();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        model.on_change(move |_, _| counter.set(counter.get() + 1));

        let err = model.set(FieldKey::FastFindRate, 0.0).unwrap_err();
        assert!(matches!(err, ParameterError::OutOfRange { .. }));
        assert_eq!(model.get(FieldKey::FastFindRate), 250.0);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let model = ParameterModel::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let log = order.clone();
            model.on_change(move |_, _| log.borrow_mut().push(n));
        }

        model.set(FieldKey::ZDistance, 5.0).unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_listener_receives_change_and_new_values() {
        let model = ParameterModel::new();
        let seen = Rc::new(RefCell::new(None));
        let log = seen.clone();
        model.on_change(move |change, values| {
            *log.borrow_mut() = Some((*change, values.get(FieldKey::ZOffset)));
        });

        model.set(FieldKey::ZOffset, 3.0).unwrap();
        assert_eq!(
            *seen.borrow(),
            Some((
                ParameterChange::Field {
                    key: FieldKey::ZOffset,
                    value: 3.0
                },
                3.0
            ))
        );
    }

    #[test]
    fn test_every_successful_set_notifies() {
        let model = ParameterModel::new();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        model.on_change(move |_, _| counter.set(counter.get() + 1));

        model.set(FieldKey::ZOffset, 10.0).unwrap();
        model.set(FieldKey::ZOffset, 10.0).unwrap();
        model.set_units(Units::INCH);
        model.set_work_coordinate_system(WorkCoordinateSystem::G56);
        assert_eq!(fired.get(), 4);
        assert_eq!(model.units(), Units::INCH);
        assert_eq!(model.work_coordinate_system(), WorkCoordinateSystem::G56);
    }

    #[test]
    fn test_reentrant_set_is_announced_in_a_follow_up_pass() {
        let model = Rc::new(ParameterModel::new());
        let fired = Rc::new(Cell::new(0));
        let (inner, counter) = (model.clone(), fired.clone());
        model.on_change(move |_, values| {
            counter.set(counter.get() + 1);
            let current = values.get(FieldKey::XyzXDistance);
            if current < 3.0 {
                inner.set(FieldKey::XyzXDistance, current + 1.0).unwrap();
            }
        });

        model.set(FieldKey::XyzXDistance, 1.0).unwrap();
        assert_eq!(fired.get(), 3);
        assert_eq!(model.get(FieldKey::XyzXDistance), 3.0);

        // The guard is released afterwards.
        model.set(FieldKey::XyzXDistance, 5.0).unwrap();
        assert_eq!(fired.get(), 4);
    }

    #[test]
    fn test_clamping_listener_reaches_later_listeners() {
        let model = Rc::new(ParameterModel::new());
        let inner = model.clone();
        model.on_change(move |_, values| {
            if values.get(FieldKey::ZDistance) > 50.0 {
                inner.set(FieldKey::ZDistance, 50.0).unwrap();
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        model.on_change(move |change, values| {
            log.borrow_mut().push((*change, values.get(FieldKey::ZDistance)));
        });

        model.set(FieldKey::ZDistance, 80.0).unwrap();

        assert_eq!(model.get(FieldKey::ZDistance), 50.0);
        assert_eq!(
            *seen.borrow(),
            vec![
                (
                    ParameterChange::Field {
                        key: FieldKey::ZDistance,
                        value: 80.0
                    },
                    50.0
                ),
                (
                    ParameterChange::Field {
                        key: FieldKey::ZDistance,
                        value: 50.0
                    },
                    50.0
                ),
            ]
        );
    }

    #[test]
    fn test_several_listener_writes_coalesce() {
        let model = Rc::new(ParameterModel::new());
        let inner = model.clone();
        model.on_change(move |change, _| {
            if matches!(change, ParameterChange::Field { key: FieldKey::ZOffset, .. }) {
                inner.set(FieldKey::ZDistance, 4.0).unwrap();
                inner.set_units(Units::INCH);
            }
        });
        let changes = Rc::new(RefCell::new(Vec::new()));
        let log = changes.clone();
        model.on_change(move |change, _| log.borrow_mut().push(*change));

        model.set(FieldKey::ZOffset, 2.0).unwrap();

        assert_eq!(changes.borrow().len(), 2);
        assert_eq!(changes.borrow()[1], ParameterChange::Restored);
        assert_eq!(model.get(FieldKey::ZDistance), 4.0);
        assert_eq!(model.units(), Units::INCH);
    }

    #[test]
    fn test_endless_listener_writes_are_capped() {
        let model = Rc::new(ParameterModel::new());
        let fired = Rc::new(Cell::new(0));
        let (inner, counter) = (model.clone(), fired.clone());
        model.on_change(move |_, values| {
            counter.set(counter.get() + 1);
            let next = values.get(FieldKey::XyzXDistance) + 1.0;
            inner.set(FieldKey::XyzXDistance, next).unwrap();
        });

        model.set(FieldKey::XyzXDistance, 1.0).unwrap();
        assert_eq!(fired.get(), MAX_NOTIFY_PASSES);
        assert_eq!(
            model.get(FieldKey::XyzXDistance),
            1.0 + MAX_NOTIFY_PASSES as f64
        );
    }

    #[test]
    fn test_listener_can_register_listener() {
        let model = Rc::new(ParameterModel::new());
        let inner = model.clone();
        model.on_change(move |_, _| {
            inner.on_change(|_, _| {});
        });

        model.set(FieldKey::ZDistance, 1.0).unwrap();
        assert_eq!(model.listener_count(), 2);
    }

    #[test]
    fn test_replace_all_is_all_or_nothing() {
        let model = ParameterModel::new();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        model.on_change(move |change, _| {
            assert_eq!(*change, ParameterChange::Restored);
            counter.set(counter.get() + 1);
        });

        let values = ParameterValues::default()
            .with(FieldKey::InsideXDistance, 42.0)
            .unwrap();
        model.replace_all(values).unwrap();
        assert_eq!(model.get(FieldKey::InsideXDistance), 42.0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let model = ParameterModel::new();
        let id = model.on_change(|_, _| panic!("removed listener fired"));
        assert!(model.remove_listener(id));
        model.set(FieldKey::ZDistance, 1.0).unwrap();
        assert_eq!(model.listener_count(), 0);
    }
}
