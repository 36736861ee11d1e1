//! Machine events
//!
//! Provides:
//! - Event types for machine state and position changes
//! - Event dispatcher for publishing events to subscribers

use crate::data::{ControllerState, Position};
use tokio::sync::broadcast;

/// Machine event types
#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    /// Controller state changed
    StateChanged {
        /// State before the change.
        previous: ControllerState,
        /// State after the change.
        current: ControllerState,
    },
    /// Position changed
    PositionChanged {
        /// Machine position.
        machine_pos: Position,
        /// Work position.
        work_pos: Position,
    },
}

impl std::fmt::Display for MachineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineEvent::StateChanged { previous, current } => {
                write!(f, "State: {} -> {}", previous, current)
            }
            MachineEvent::PositionChanged {
                machine_pos,
                work_pos,
            } => write!(f, "Position - Machine: {}, Work: {}", machine_pos, work_pos),
        }
    }
}

/// Event dispatcher for publishing events to subscribers
#[derive(Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for machine events.
    tx: broadcast::Sender<MachineEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 100)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Create a new event dispatcher with default buffer size
    pub fn default_with_buffer() -> Self {
        Self::new(100)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<MachineEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of subscribers that received it; publishing with
    /// no subscribers is not an error.
    pub fn publish(&self, event: MachineEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::default_with_buffer()
    }
}
