//! Application lifecycle state machine.
//!
//! # States
//! ```text
//! Uninitialized → Initialized → Running → ShuttingDown → Stopped
//! ```
//!
//! No transition may be skipped. Each state is entered at most once: every
//! move is a compare-and-swap from the expected predecessor.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Phase of the application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    Uninitialized = 0,
    Initialized = 1,
    Running = 2,
    ShuttingDown = 3,
    Stopped = 4,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LifecycleState::Uninitialized,
            1 => LifecycleState::Initialized,
            2 => LifecycleState::Running,
            3 => LifecycleState::ShuttingDown,
            _ => LifecycleState::Stopped,
        }
    }

    /// The only state reachable from `self`, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            LifecycleState::Uninitialized => Some(LifecycleState::Initialized),
            LifecycleState::Initialized => Some(LifecycleState::Running),
            LifecycleState::Running => Some(LifecycleState::ShuttingDown),
            LifecycleState::ShuttingDown => Some(LifecycleState::Stopped),
            LifecycleState::Stopped => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Misuse of the lifecycle API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("application has not been initialized")]
    NotInitialized,

    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("cannot {operation} while {state}")]
    WrongState {
        operation: &'static str,
        state: LifecycleState,
    },
}

/// Shared, concurrently readable lifecycle state.
#[derive(Debug, Clone)]
pub struct StateHandle {
    inner: Arc<AtomicU8>,
}

impl StateHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(LifecycleState::Uninitialized as u8)),
        }
    }

    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.inner.load(Ordering::SeqCst))
    }

    /// Move from `from` to its successor `to`.
    ///
    /// Fails without changing anything if `to` does not follow `from` or the
    /// current state is not `from`.
    pub fn transition(
        &self,
        from: LifecycleState,
        to: LifecycleState,
    ) -> Result<(), LifecycleError> {
        if from.next() != Some(to) {
            return Err(LifecycleError::InvalidTransition { from, to });
        }
        self.inner
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|actual| LifecycleError::InvalidTransition {
                from: LifecycleState::from_u8(actual),
                to,
            })
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let state = StateHandle::new();
        assert_eq!(state.get(), LifecycleState::Uninitialized);

        let mut current = state.get();
        while let Some(next) = current.next() {
            state.transition(current, next).unwrap();
            assert_eq!(state.get(), next);
            current = next;
        }
        assert_eq!(state.get(), LifecycleState::Stopped);
    }

    #[test]
    fn test_skipping_is_rejected() {
        let state = StateHandle::new();
        let err = state
            .transition(LifecycleState::Uninitialized, LifecycleState::Running)
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: LifecycleState::Uninitialized,
                to: LifecycleState::Running,
            }
        );
        assert_eq!(state.get(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_state_entered_once() {
        let state = StateHandle::new();
        state
            .transition(LifecycleState::Uninitialized, LifecycleState::Initialized)
            .unwrap();
        let err = state
            .transition(LifecycleState::Uninitialized, LifecycleState::Initialized)
            .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::InvalidTransition { from: LifecycleState::Initialized, .. }
        ));
    }

    #[test]
    fn test_clones_observe_transitions() {
        let state = StateHandle::new();
        let observer = state.clone();
        state
            .transition(LifecycleState::Uninitialized, LifecycleState::Initialized)
            .unwrap();
        assert_eq!(observer.get(), LifecycleState::Initialized);
    }
}
