//! State transition history tracking.
//!
//! Provides immutable tracking of fired transitions over time.

use super::state::{State, Trigger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single fired transition.
///
/// # Example
///
/// ```rust
/// use substate::core::StateTransition;
/// use substate::{state_enum, trigger_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum Parcel { Draft, Initialized }
/// }
/// trigger_enum! {
///     enum Event { ProcessingRequested }
/// }
///
/// let transition = StateTransition {
///     from: Parcel::Draft,
///     to: Parcel::Initialized,
///     trigger: Event::ProcessingRequested,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, Parcel::Initialized);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, T: Trigger> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// The trigger that was fired
    pub trigger: T,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of fired transitions.
///
/// History is immutable - the `record` method returns a new history
/// with the transition added.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, T: Trigger> {
    transitions: Vec<StateTransition<S, T>>,
}

impl<S: State, T: Trigger> Default for StateHistory<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Trigger> StateHistory<S, T> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S, T>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place.
    pub(crate) fn push(&mut self, transition: StateTransition<S, T>) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first transition followed by the
    /// `to` state of every transition. Empty when nothing has fired.
    ///
    /// # Example
    ///
    /// ```rust
    /// use substate::core::{StateHistory, StateTransition};
    /// use substate::{state_enum, trigger_enum};
    /// use chrono::Utc;
    ///
    /// state_enum! {
    ///     enum Phase { One, Two, Three }
    /// }
    /// trigger_enum! {
    ///     enum Step { Next }
    /// }
    ///
    /// let history = StateHistory::new()
    ///     .record(StateTransition {
    ///         from: Phase::One,
    ///         to: Phase::Two,
    ///         trigger: Step::Next,
    ///         timestamp: Utc::now(),
    ///     })
    ///     .record(StateTransition {
    ///         from: Phase::Two,
    ///         to: Phase::Three,
    ///         trigger: Step::Next,
    ///         timestamp: Utc::now(),
    ///     });
    ///
    /// let path = history.get_path();
    /// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
    /// ```
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions in firing order.
    pub fn transitions(&self) -> &[StateTransition<S, T>] {
        &self.transitions
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S, T>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
