//! Renderer lifecycle state machine
//!
//! Every renderer handle goes Uninitialized → Running → Stopped. Stopped is
//! terminal: a stopped handle is discarded, never restarted. A failed start
//! goes straight from Uninitialized to Stopped.

use smallvec::SmallVec;
use thiserror::Error;

/// Lifecycle state of a renderer handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Running,
    Stopped,
}

/// Event driving a lifecycle transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Surface acquired and frame callback scheduled
    Start,
    /// Surface could not be acquired during start
    Fail,
    /// Resources released
    Stop,
}

/// Rejected lifecycle transition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("invalid lifecycle transition: {event:?} while {from:?}")]
    InvalidTransition {
        from: LifecycleState,
        event: LifecycleEvent,
    },
}

use LifecycleEvent::*;
use LifecycleState::*;

const TRANSITIONS: &[(LifecycleState, LifecycleEvent, LifecycleState)] = &[
    (Uninitialized, Start, Running),
    (Uninitialized, Fail, Stopped),
    (Uninitialized, Stop, Stopped),
    (Running, Stop, Stopped),
];

/// Lifecycle of a single renderer handle
#[derive(Debug, Clone)]
pub struct Lifecycle {
    current: LifecycleState,
    /// History of transitions (for debugging)
    history: SmallVec<[(LifecycleState, LifecycleEvent, LifecycleState); 2]>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            current: Uninitialized,
            history: SmallVec::new(),
        }
    }

    pub fn current(&self) -> LifecycleState {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.current == Running
    }

    pub fn is_stopped(&self) -> bool {
        self.current == Stopped
    }

    pub fn history(&self) -> &[(LifecycleState, LifecycleEvent, LifecycleState)] {
        &self.history
    }

    /// Check if an event would trigger a transition from the current state
    pub fn can_send(&self, event: LifecycleEvent) -> bool {
        self.target(event).is_some()
    }

    /// Apply an event, returning the new state
    pub fn send(&mut self, event: LifecycleEvent) -> Result<LifecycleState, LifecycleError> {
        let from = self.current;
        let to = self
            .target(event)
            .ok_or(LifecycleError::InvalidTransition { from, event })?;

        self.current = to;
        self.history.push((from, event, to));
        tracing::debug!(?from, ?event, ?to, "lifecycle transition");
        Ok(to)
    }

    fn target(&self, event: LifecycleEvent) -> Option<LifecycleState> {
        TRANSITIONS
            .iter()
            .find(|(from, ev, _)| *from == self.current && *ev == event)
            .map(|(_, _, to)| *to)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_then_stop() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.send(Start), Ok(Running));
        assert!(lc.is_running());
        assert_eq!(lc.send(Stop), Ok(Stopped));
        assert!(lc.is_stopped());
        assert_eq!(lc.history().len(), 2);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut lc = Lifecycle::new();
        lc.send(Start).unwrap();
        lc.send(Stop).unwrap();

        for event in [Start, Fail, Stop] {
            assert!(!lc.can_send(event));
            assert_eq!(
                lc.send(event),
                Err(LifecycleError::InvalidTransition {
                    from: Stopped,
                    event
                })
            );
        }
        assert_eq!(lc.current(), Stopped);
    }

    #[test]
    fn test_failed_start_stops() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.send(Fail), Ok(Stopped));
        assert!(!lc.can_send(Start));
    }

    #[test]
    fn test_double_start_rejected() {
        let mut lc = Lifecycle::new();
        lc.send(Start).unwrap();
        assert!(lc.send(Start).is_err());
        assert!(lc.is_running());
    }
}
