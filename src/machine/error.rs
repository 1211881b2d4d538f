//! Run-time errors raised by firing triggers.

use crate::core::{State, Trigger};
use thiserror::Error;

/// Errors that can occur when firing a trigger.
///
/// The machine is never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError<S: State, T: Trigger> {
    #[error(
        "Trigger '{}' is not permitted from state '{}' or any of its superstates",
        .trigger.name(),
        .state.name()
    )]
    InvalidTransition { state: S, trigger: T },
}

impl<S: State, T: Trigger> TransitionError<S, T> {
    /// The state the machine was in when the trigger was rejected.
    pub fn state(&self) -> &S {
        match self {
            Self::InvalidTransition { state, .. } => state,
        }
    }

    pub fn trigger(&self) -> &T {
        match self {
            Self::InvalidTransition { trigger, .. } => trigger,
        }
    }
}
