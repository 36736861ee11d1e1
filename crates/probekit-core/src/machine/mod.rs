//! Machine state access
//!
//! Probing reads three things from the machine: where it is in machine
//! coordinates, where it is in work coordinates, and whether it is idle.
//! The [`MachineStateProvider`] trait is that read-only view; it is injected
//! wherever those values are needed instead of being looked up globally.
//!
//! [`SharedMachineState`] is the provider shipped with the crate. It is
//! written by the communication side (status reports) and read by the UI
//! thread, and publishes [`MachineEvent`]s so the UI can react to idle
//! changes.

pub mod event;

pub use event::{EventDispatcher, MachineEvent};

use crate::data::{ControllerState, Position};
use crate::types::{thread_safe_rw, ThreadSafeRw};
use tokio::sync::broadcast;

/// Read-only view of the live machine state
pub trait MachineStateProvider {
    /// Current position in machine coordinates
    fn machine_position(&self) -> Position;

    /// Current position in the active work coordinate system
    fn work_position(&self) -> Position;

    /// Whether the machine can accept a new probe cycle
    fn is_idle(&self) -> bool;

    /// Controller state, for diagnostics
    fn controller_state(&self) -> ControllerState {
        if self.is_idle() {
            ControllerState::Idle
        } else {
            ControllerState::Run
        }
    }
}

/// Point-in-time copy of the machine state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MachineSnapshot {
    /// Controller state
    pub state: ControllerState,
    /// Machine position
    pub machine_pos: Position,
    /// Work position
    pub work_pos: Position,
}

/// Thread-safe machine state updated from status reports
#[derive(Clone)]
pub struct SharedMachineState {
    inner: ThreadSafeRw<MachineSnapshot>,
    events: EventDispatcher,
}

impl SharedMachineState {
    /// Create a disconnected machine at the origin
    pub fn new() -> Self {
        Self::with_snapshot(MachineSnapshot::default())
    }

    /// Create from an initial snapshot
    pub fn with_snapshot(snapshot: MachineSnapshot) -> Self {
        Self {
            inner: thread_safe_rw(snapshot),
            events: EventDispatcher::default(),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> MachineSnapshot {
        *self.inner.read()
    }

    /// Subscribe to state and position changes
    pub fn subscribe(&self) -> broadcast::Receiver<MachineEvent> {
        self.events.subscribe()
    }

    /// Update the controller state, publishing a change event if it differs
    pub fn set_state(&self, state: ControllerState) {
        let previous = {
            let mut inner = self.inner.write();
            let previous = inner.state;
            inner.state = state;
            previous
        };

        if previous != state {
            tracing::debug!("Machine state {} -> {}", previous, state);
            self.events.publish(MachineEvent::StateChanged {
                previous,
                current: state,
            });
        }
    }

    /// Update both positions from a status report
    pub fn set_positions(&self, machine_pos: Position, work_pos: Position) {
        let changed = {
            let mut inner = self.inner.write();
            let changed = inner.machine_pos != machine_pos || inner.work_pos != work_pos;
            inner.machine_pos = machine_pos;
            inner.work_pos = work_pos;
            changed
        };

        if changed {
            self.events.publish(MachineEvent::PositionChanged {
                machine_pos,
                work_pos,
            });
        }
    }
}

impl Default for SharedMachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineStateProvider for SharedMachineState {
    fn machine_position(&self) -> Position {
        self.inner.read().machine_pos
    }

    fn work_position(&self) -> Position {
        self.inner.read().work_pos
    }

    fn is_idle(&self) -> bool {
        self.inner.read().state.is_idle()
    }

    fn controller_state(&self) -> ControllerState {
        self.inner.read().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_reads_latest_values() {
        let machine = SharedMachineState::new();
        assert!(!machine.is_idle());

        machine.set_state(ControllerState::Idle);
        machine.set_positions(Position::new(1.0, 2.0, 3.0), Position::new(0.5, 0.5, 0.5));

        assert!(machine.is_idle());
        assert_eq!(machine.machine_position(), Position::new(1.0, 2.0, 3.0));
        assert_eq!(machine.work_position(), Position::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_state_change_is_published_once() {
        let machine = SharedMachineState::new();
        let mut rx = machine.subscribe();

        machine.set_state(ControllerState::Idle);
        machine.set_state(ControllerState::Idle);

        assert_eq!(
            rx.try_recv().ok(),
            Some(MachineEvent::StateChanged {
                previous: ControllerState::Disconnected,
                current: ControllerState::Idle,
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let machine = SharedMachineState::new();
        let reader = machine.clone();
        machine.set_state(ControllerState::Probe);
        assert_eq!(reader.controller_state(), ControllerState::Probe);
        assert!(!reader.is_idle());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let dispatcher = EventDispatcher::default();
        assert_eq!(
            dispatcher.publish(MachineEvent::StateChanged {
                previous: ControllerState::Idle,
                current: ControllerState::Run,
            }),
            0
        );
    }
}
