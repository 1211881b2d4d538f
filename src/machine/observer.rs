//! Hooks notified after each successful transition.

use crate::core::{State, StateTransition, Trigger};

/// Receives every transition a machine performs.
///
/// Observers run after the machine's state has been updated, so
/// `transition.to` is always the machine's current state while they run.
/// They must not block; the machine calls them inline from `fire`.
pub trait TransitionObserver<S: State, T: Trigger>: Send + Sync {
    fn on_transition(&self, transition: &StateTransition<S, T>);
}

impl<S, T, F> TransitionObserver<S, T> for F
where
    S: State,
    T: Trigger,
    F: Fn(&StateTransition<S, T>) + Send + Sync,
{
    fn on_transition(&self, transition: &StateTransition<S, T>) {
        self(transition)
    }
}

/// Observer that logs each transition through `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl<S: State, T: Trigger> TransitionObserver<S, T> for TracingObserver {
    fn on_transition(&self, transition: &StateTransition<S, T>) {
        tracing::info!(
            from = transition.from.name(),
            to = transition.to.name(),
            trigger = transition.trigger.name(),
            "transitioned"
        );
    }
}
