//! Machine instance that fires triggers against a shared configuration.

use crate::builder::Configuration;
use crate::core::{State, StateHistory, StateTransition, Trigger};
use crate::machine::error::TransitionError;
use crate::machine::observer::TransitionObserver;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// A single running machine.
///
/// The configuration is shared with every other machine built from it;
/// the current state and history belong to this instance alone. Firing
/// requires `&mut self`, so concurrent use of one instance has to be
/// serialized by the owner.
///
/// # Example
///
/// ```
/// use substate::builder::ConfigurationBuilder;
/// use substate::machine::StateMachine;
/// use substate::{state_enum, trigger_enum};
///
/// state_enum! {
///     enum Shipment { Draft, Initialized }
/// }
/// trigger_enum! {
///     enum Request { ProcessingRequested }
/// }
///
/// let mut builder = ConfigurationBuilder::new();
/// builder.permit(Shipment::Draft, Request::ProcessingRequested, Shipment::Initialized)?;
/// let config = builder.build()?;
///
/// let mut machine = StateMachine::new(config, Shipment::Draft);
/// assert!(machine.can_fire(&Request::ProcessingRequested));
/// assert_eq!(machine.fire(Request::ProcessingRequested), Ok(Shipment::Initialized));
/// assert!(machine.fire(Request::ProcessingRequested).is_err());
/// assert_eq!(machine.current_state(), &Shipment::Initialized);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StateMachine<S: State, T: Trigger> {
    pub(crate) config: Arc<Configuration<S, T>>,
    pub(crate) initial: S,
    pub(crate) current: S,
    pub(crate) history: StateHistory<S, T>,
    observers: Vec<Box<dyn TransitionObserver<S, T>>>,
}

impl<S: State, T: Trigger> StateMachine<S, T> {
    /// Create a machine in `initial` against a built configuration.
    pub fn new(config: Arc<Configuration<S, T>>, initial: S) -> Self {
        Self::with_history(config, initial.clone(), initial, StateHistory::new())
    }

    pub(crate) fn with_history(
        config: Arc<Configuration<S, T>>,
        initial: S,
        current: S,
        history: StateHistory<S, T>,
    ) -> Self {
        Self {
            config,
            initial,
            current,
            history,
            observers: Vec::new(),
        }
    }

    /// Register a closure run after every successful transition.
    pub fn on_transition<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&StateTransition<S, T>) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Register an observer run after every successful transition.
    pub fn add_observer<O>(&mut self, observer: O) -> &mut Self
    where
        O: TransitionObserver<S, T> + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Fire `trigger` from the current state.
    ///
    /// On success the current state is replaced by the resolved target, the
    /// transition is recorded, observers are notified, and the new state is
    /// returned. On failure nothing changes.
    pub fn fire(&mut self, trigger: T) -> Result<S, TransitionError<S, T>> {
        let Some(target) = self.config.resolve(&self.current, &trigger).cloned() else {
            warn!(
                state = self.current.name(),
                trigger = trigger.name(),
                "trigger not permitted"
            );
            return Err(TransitionError::InvalidTransition {
                state: self.current.clone(),
                trigger,
            });
        };

        let from = std::mem::replace(&mut self.current, target.clone());
        debug!(
            from = from.name(),
            to = target.name(),
            trigger = trigger.name(),
            "transition fired"
        );

        self.history.push(StateTransition {
            from,
            to: target.clone(),
            trigger,
            timestamp: Utc::now(),
        });
        if let Some(transition) = self.history.last() {
            for observer in &self.observers {
                observer.on_transition(transition);
            }
        }

        Ok(target)
    }

    /// Whether `trigger` would succeed from the current state (pure).
    pub fn can_fire(&self, trigger: &T) -> bool {
        self.config.can_fire(&self.current, trigger)
    }

    /// Whether the machine is in `state` or in one of its substates (pure).
    pub fn is_in_state(&self, state: &S) -> bool {
        self.config.is_in_state(&self.current, state)
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// Triggers that can currently be fired, direct ones first.
    pub fn permitted_triggers(&self) -> Vec<&T> {
        self.config.permitted_triggers(&self.current)
    }

    /// True when no trigger can be fired from the current state.
    pub fn is_terminal(&self) -> bool {
        self.permitted_triggers().is_empty()
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory<S, T> {
        &self.history
    }

    pub fn configuration(&self) -> &Arc<Configuration<S, T>> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConfigurationBuilder;
    use crate::{state_enum, trigger_enum};
    use std::sync::Mutex;

    state_enum! {
        enum TestState {
            Draft,
            Initialized,
            Manifested,
            ShippingDocsCreated,
            LabelsCreated,
            QrCodeCreated,
            ReceiptCreated,
            CancellationCompleted,
        }
    }

    trigger_enum! {
        enum TestTrigger {
            ProcessingRequested,
            ManifestationRequested,
            ReceiptGenerationRequested,
            ShipmentCancellationRequested,
        }
    }

    fn config() -> Arc<Configuration<TestState, TestTrigger>> {
        let mut builder = ConfigurationBuilder::new();
        builder
            .permit(
                TestState::Draft,
                TestTrigger::ProcessingRequested,
                TestState::Initialized,
            )
            .unwrap()
            .permit(
                TestState::Initialized,
                TestTrigger::ManifestationRequested,
                TestState::Manifested,
            )
            .unwrap()
            .permit(
                TestState::ShippingDocsCreated,
                TestTrigger::ShipmentCancellationRequested,
                TestState::CancellationCompleted,
            )
            .unwrap();
        builder
            .configure(TestState::LabelsCreated)
            .substate_of(TestState::ShippingDocsCreated)
            .unwrap()
            .permit(
                TestTrigger::ReceiptGenerationRequested,
                TestState::ReceiptCreated,
            )
            .unwrap();
        builder
            .configure(TestState::QrCodeCreated)
            .substate_of(TestState::ShippingDocsCreated)
            .unwrap()
            .permit(
                TestTrigger::ShipmentCancellationRequested,
                TestState::Draft,
            )
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn fire_moves_to_target() {
        let mut machine = StateMachine::new(config(), TestState::Draft);

        let result = machine.fire(TestTrigger::ProcessingRequested);

        assert_eq!(result, Ok(TestState::Initialized));
        assert_eq!(machine.current_state(), &TestState::Initialized);
        assert_eq!(machine.initial_state(), &TestState::Draft);
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn invalid_trigger_leaves_state_unchanged() {
        let mut machine = StateMachine::new(config(), TestState::Draft);

        let result = machine.fire(TestTrigger::ManifestationRequested);

        assert_eq!(
            result,
            Err(TransitionError::InvalidTransition {
                state: TestState::Draft,
                trigger: TestTrigger::ManifestationRequested,
            })
        );
        assert_eq!(machine.current_state(), &TestState::Draft);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn substate_inherits_parent_rule() {
        let mut machine = StateMachine::new(config(), TestState::LabelsCreated);

        assert!(machine.can_fire(&TestTrigger::ShipmentCancellationRequested));
        assert_eq!(
            machine.fire(TestTrigger::ShipmentCancellationRequested),
            Ok(TestState::CancellationCompleted)
        );
    }

    #[test]
    fn direct_rule_overrides_parent_rule() {
        let mut machine = StateMachine::new(config(), TestState::QrCodeCreated);

        assert_eq!(
            machine.fire(TestTrigger::ShipmentCancellationRequested),
            Ok(TestState::Draft)
        );
    }

    #[test]
    fn is_in_state_tracks_superstate() {
        let mut machine = StateMachine::new(config(), TestState::LabelsCreated);

        assert!(machine.is_in_state(&TestState::LabelsCreated));
        assert!(machine.is_in_state(&TestState::ShippingDocsCreated));
        assert!(!machine.is_in_state(&TestState::QrCodeCreated));

        machine.fire(TestTrigger::ReceiptGenerationRequested).unwrap();

        assert!(!machine.is_in_state(&TestState::ShippingDocsCreated));
        assert!(machine.is_in_state(&TestState::ReceiptCreated));
    }

    #[test]
    fn terminal_state_has_no_permitted_triggers() {
        let machine = StateMachine::new(config(), TestState::CancellationCompleted);

        assert!(machine.is_terminal());
        assert!(!machine.can_fire(&TestTrigger::ProcessingRequested));
    }

    #[test]
    fn permitted_triggers_include_inherited() {
        let machine = StateMachine::new(config(), TestState::LabelsCreated);

        assert_eq!(
            machine.permitted_triggers(),
            vec![
                &TestTrigger::ReceiptGenerationRequested,
                &TestTrigger::ShipmentCancellationRequested
            ]
        );
        assert!(!machine.is_terminal());
    }

    #[test]
    fn observers_see_post_transition_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut machine = StateMachine::new(config(), TestState::Draft);

        let sink = Arc::clone(&seen);
        machine.on_transition(move |t: &StateTransition<TestState, TestTrigger>| {
            sink.lock().unwrap().push((t.from, t.to, t.trigger));
        });

        machine.fire(TestTrigger::ProcessingRequested).unwrap();
        let _ = machine.fire(TestTrigger::ProcessingRequested);
        machine.fire(TestTrigger::ManifestationRequested).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (
                    TestState::Draft,
                    TestState::Initialized,
                    TestTrigger::ProcessingRequested
                ),
                (
                    TestState::Initialized,
                    TestState::Manifested,
                    TestTrigger::ManifestationRequested
                ),
            ]
        );
    }

    #[test]
    fn history_records_path() {
        let mut machine = StateMachine::new(config(), TestState::Draft);
        machine.fire(TestTrigger::ProcessingRequested).unwrap();
        machine.fire(TestTrigger::ManifestationRequested).unwrap();

        assert_eq!(
            machine.history().get_path(),
            vec![
                &TestState::Draft,
                &TestState::Initialized,
                &TestState::Manifested
            ]
        );
    }

    #[test]
    fn machines_share_configuration_but_not_state() {
        let config = config();
        let mut first = StateMachine::new(Arc::clone(&config), TestState::Draft);
        let second = StateMachine::new(Arc::clone(&config), TestState::Draft);

        first.fire(TestTrigger::ProcessingRequested).unwrap();

        assert_eq!(first.current_state(), &TestState::Initialized);
        assert_eq!(second.current_state(), &TestState::Draft);
        assert!(Arc::ptr_eq(first.configuration(), second.configuration()));
    }
}
