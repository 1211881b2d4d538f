//! Builder for declaring transition rules and substate edges.

use crate::builder::error::ConfigError;
use crate::builder::table::{Configuration, TransitionRule};
use crate::core::{State, Trigger};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builder for a [`Configuration`].
///
/// Rules and substate edges are checked as they are declared, so a
/// rejected call never leaves a partial declaration behind. Once
/// [`build`](Self::build) has been called the builder is frozen.
///
/// # Example
///
/// ```
/// use substate::builder::ConfigurationBuilder;
/// use substate::{state_enum, trigger_enum};
///
/// state_enum! {
///     enum Shipment { Draft, Initialized, Cancelled }
/// }
/// trigger_enum! {
///     enum Request { Process, Cancel }
/// }
///
/// let mut builder = ConfigurationBuilder::new();
/// builder
///     .permit(Shipment::Draft, Request::Process, Shipment::Initialized)?
///     .permit(Shipment::Initialized, Request::Cancel, Shipment::Cancelled)?;
/// let config = builder.build()?;
///
/// assert_eq!(
///     config.resolve(&Shipment::Draft, &Request::Process),
///     Some(&Shipment::Initialized)
/// );
/// # Ok::<(), substate::builder::ConfigError>(())
/// ```
pub struct ConfigurationBuilder<S: State, T: Trigger> {
    table: Configuration<S, T>,
    frozen: Option<Arc<Configuration<S, T>>>,
}

impl<S: State, T: Trigger> ConfigurationBuilder<S, T> {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self {
            table: Configuration::default(),
            frozen: None,
        }
    }

    /// Start configuring a single state with a fluent API.
    pub fn configure(&mut self, state: S) -> StateConfigurer<'_, S, T> {
        StateConfigurer {
            builder: self,
            state,
        }
    }

    /// Permit `trigger` to move `source` to `target`.
    ///
    /// Declaring the identical rule again is a no-op. Declaring the same
    /// `(source, trigger)` pair with a different target fails with
    /// [`ConfigError::DuplicateTransition`].
    pub fn permit(&mut self, source: S, trigger: T, target: S) -> Result<&mut Self, ConfigError> {
        self.ensure_unfrozen()?;

        let existing = self.table.direct_target(&source, &trigger).cloned();
        match existing {
            Some(existing) if existing == target => {
                debug!(
                    state = source.name(),
                    trigger = trigger.name(),
                    to = target.name(),
                    "rule already declared"
                );
                Ok(self)
            }
            Some(existing) => {
                warn!(
                    state = source.name(),
                    trigger = trigger.name(),
                    existing = existing.name(),
                    requested = target.name(),
                    "conflicting rule rejected"
                );
                Err(ConfigError::DuplicateTransition {
                    state: source.name().to_string(),
                    trigger: trigger.name().to_string(),
                    existing: existing.name().to_string(),
                    requested: target.name().to_string(),
                })
            }
            None => {
                debug!(
                    state = source.name(),
                    trigger = trigger.name(),
                    to = target.name(),
                    "rule declared"
                );
                self.table.insert_rule(TransitionRule {
                    source,
                    trigger,
                    target,
                });
                Ok(self)
            }
        }
    }

    /// Declare `child` a substate of `parent`.
    ///
    /// Repeating an existing edge is a no-op. Fails with
    /// [`ConfigError::CyclicHierarchy`] if `parent` is `child` or one of its
    /// descendants, and with [`ConfigError::MultipleParent`] if `child`
    /// already has another parent.
    pub fn substate_of(&mut self, child: S, parent: S) -> Result<&mut Self, ConfigError> {
        self.ensure_unfrozen()?;

        if let Some(existing) = self.table.parent_of(&child).cloned() {
            if existing == parent {
                return Ok(self);
            }
            warn!(
                child = child.name(),
                existing = existing.name(),
                requested = parent.name(),
                "second parent rejected"
            );
            return Err(ConfigError::MultipleParent {
                child: child.name().to_string(),
                existing: existing.name().to_string(),
                requested: parent.name().to_string(),
            });
        }

        if self.table.is_in_state(&parent, &child) {
            warn!(
                child = child.name(),
                superstate = parent.name(),
                "cyclic substate edge rejected"
            );
            return Err(ConfigError::CyclicHierarchy {
                child: child.name().to_string(),
                parent: parent.name().to_string(),
            });
        }

        debug!(
            child = child.name(),
            superstate = parent.name(),
            "substate declared"
        );
        self.table.insert_parent(child, parent);
        Ok(self)
    }

    /// Freeze the builder and return the shared configuration.
    ///
    /// Later calls return the same configuration; later `permit` or
    /// `substate_of` calls fail with [`ConfigError::ConfigurationFrozen`].
    pub fn build(&mut self) -> Result<Arc<Configuration<S, T>>, ConfigError> {
        if let Some(frozen) = &self.frozen {
            return Ok(Arc::clone(frozen));
        }

        let config = Arc::new(std::mem::take(&mut self.table));
        info!(
            states = config.states().len(),
            triggers = config.triggers().len(),
            rules = config.rules().count(),
            "configuration frozen"
        );
        self.frozen = Some(Arc::clone(&config));
        Ok(config)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    fn ensure_unfrozen(&self) -> Result<(), ConfigError> {
        if self.is_frozen() {
            warn!("modification of a built configuration rejected");
            return Err(ConfigError::ConfigurationFrozen);
        }
        Ok(())
    }
}

impl<S: State, T: Trigger> Default for ConfigurationBuilder<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent view over a single state of a [`ConfigurationBuilder`].
///
/// ```
/// use substate::builder::ConfigurationBuilder;
/// use substate::{state_enum, trigger_enum};
///
/// state_enum! {
///     enum Docs { ShippingDocsCreated, LabelsCreated, ReceiptCreated }
/// }
/// trigger_enum! {
///     enum Request { ReceiptGenerationRequested }
/// }
///
/// let mut builder = ConfigurationBuilder::new();
/// builder
///     .configure(Docs::LabelsCreated)
///     .substate_of(Docs::ShippingDocsCreated)?
///     .permit(Request::ReceiptGenerationRequested, Docs::ReceiptCreated)?;
/// # Ok::<(), substate::builder::ConfigError>(())
/// ```
pub struct StateConfigurer<'a, S: State, T: Trigger> {
    builder: &'a mut ConfigurationBuilder<S, T>,
    state: S,
}

impl<'a, S: State, T: Trigger> StateConfigurer<'a, S, T> {
    /// Permit `trigger` to move this state to `target`.
    pub fn permit(self, trigger: T, target: S) -> Result<Self, ConfigError> {
        self.builder.permit(self.state.clone(), trigger, target)?;
        Ok(self)
    }

    /// Declare this state a substate of `parent`.
    pub fn substate_of(self, parent: S) -> Result<Self, ConfigError> {
        self.builder.substate_of(self.state.clone(), parent)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state_enum, trigger_enum};

    state_enum! {
        enum TestState {
            Draft,
            Initialized,
            Manifested,
            ShippingDocsCreated,
            LabelsCreated,
            CancellationCompleted,
        }
    }

    trigger_enum! {
        enum TestTrigger {
            ProcessingRequested,
            ManifestationRequested,
            ShipmentCancellationRequested,
        }
    }

    #[test]
    fn permit_registers_rule() {
        let mut builder = ConfigurationBuilder::new();
        builder
            .permit(
                TestState::Draft,
                TestTrigger::ProcessingRequested,
                TestState::Initialized,
            )
            .unwrap();

        let config = builder.build().unwrap();
        assert_eq!(
            config.direct_target(&TestState::Draft, &TestTrigger::ProcessingRequested),
            Some(&TestState::Initialized)
        );
    }

    #[test]
    fn identical_rule_is_idempotent() {
        let mut builder = ConfigurationBuilder::new();
        builder
            .permit(
                TestState::Manifested,
                TestTrigger::ShipmentCancellationRequested,
                TestState::CancellationCompleted,
            )
            .unwrap()
            .permit(
                TestState::Manifested,
                TestTrigger::ShipmentCancellationRequested,
                TestState::CancellationCompleted,
            )
            .unwrap();

        let config = builder.build().unwrap();
        assert_eq!(config.rules().count(), 1);
    }

    #[test]
    fn conflicting_rule_is_rejected() {
        let mut builder = ConfigurationBuilder::new();
        builder
            .permit(
                TestState::Draft,
                TestTrigger::ProcessingRequested,
                TestState::Initialized,
            )
            .unwrap();

        let result = builder.permit(
            TestState::Draft,
            TestTrigger::ProcessingRequested,
            TestState::Manifested,
        );

        assert_eq!(
            result.err(),
            Some(ConfigError::DuplicateTransition {
                state: "Draft".to_string(),
                trigger: "ProcessingRequested".to_string(),
                existing: "Initialized".to_string(),
                requested: "Manifested".to_string(),
            })
        );

        let config = builder.build().unwrap();
        assert_eq!(
            config.direct_target(&TestState::Draft, &TestTrigger::ProcessingRequested),
            Some(&TestState::Initialized)
        );
    }

    #[test]
    fn self_parenting_is_cyclic() {
        let mut builder: ConfigurationBuilder<TestState, TestTrigger> = ConfigurationBuilder::new();
        let result = builder.substate_of(TestState::LabelsCreated, TestState::LabelsCreated);
        assert!(matches!(result, Err(ConfigError::CyclicHierarchy { .. })));
    }

    #[test]
    fn two_state_cycle_is_rejected() {
        let mut builder: ConfigurationBuilder<TestState, TestTrigger> = ConfigurationBuilder::new();
        builder
            .substate_of(TestState::LabelsCreated, TestState::ShippingDocsCreated)
            .unwrap();

        let result = builder.substate_of(TestState::ShippingDocsCreated, TestState::LabelsCreated);
        assert!(matches!(result, Err(ConfigError::CyclicHierarchy { .. })));

        let config = builder.build().unwrap();
        assert_eq!(config.parent_of(&TestState::ShippingDocsCreated), None);
    }

    #[test]
    fn transitive_cycle_is_rejected() {
        let mut builder: ConfigurationBuilder<TestState, TestTrigger> = ConfigurationBuilder::new();
        builder
            .substate_of(TestState::LabelsCreated, TestState::ShippingDocsCreated)
            .unwrap()
            .substate_of(TestState::ShippingDocsCreated, TestState::Manifested)
            .unwrap();

        let result = builder.substate_of(TestState::Manifested, TestState::LabelsCreated);
        assert!(matches!(result, Err(ConfigError::CyclicHierarchy { .. })));
    }

    #[test]
    fn second_parent_is_rejected() {
        let mut builder: ConfigurationBuilder<TestState, TestTrigger> = ConfigurationBuilder::new();
        builder
            .substate_of(TestState::LabelsCreated, TestState::ShippingDocsCreated)
            .unwrap();

        // Repeating the same edge is fine.
        builder
            .substate_of(TestState::LabelsCreated, TestState::ShippingDocsCreated)
            .unwrap();

        let result = builder.substate_of(TestState::LabelsCreated, TestState::Manifested);
        assert!(matches!(result, Err(ConfigError::MultipleParent { .. })));
    }

    #[test]
    fn built_configuration_is_frozen() {
        let mut builder = ConfigurationBuilder::new();
        builder
            .permit(
                TestState::Draft,
                TestTrigger::ProcessingRequested,
                TestState::Initialized,
            )
            .unwrap();
        let first = builder.build().unwrap();

        assert!(builder.is_frozen());
        assert!(matches!(
            builder.permit(
                TestState::Initialized,
                TestTrigger::ManifestationRequested,
                TestState::Manifested,
            ),
            Err(ConfigError::ConfigurationFrozen)
        ));
        assert!(matches!(
            builder.substate_of(TestState::LabelsCreated, TestState::ShippingDocsCreated),
            Err(ConfigError::ConfigurationFrozen)
        ));

        let second = builder.build().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.rules().count(), 1);
    }

    #[test]
    fn configurer_chains_permit_and_substate() {
        let mut builder = ConfigurationBuilder::new();
        builder
            .configure(TestState::LabelsCreated)
            .substate_of(TestState::ShippingDocsCreated)
            .unwrap()
            .permit(
                TestTrigger::ShipmentCancellationRequested,
                TestState::CancellationCompleted,
            )
            .unwrap();

        let config = builder.build().unwrap();
        assert_eq!(
            config.parent_of(&TestState::LabelsCreated),
            Some(&TestState::ShippingDocsCreated)
        );
        assert!(config.can_fire(
            &TestState::LabelsCreated,
            &TestTrigger::ShipmentCancellationRequested
        ));
    }

    #[test]
    fn configurer_surfaces_errors() {
        let mut builder = ConfigurationBuilder::new();
        builder
            .permit(
                TestState::Draft,
                TestTrigger::ProcessingRequested,
                TestState::Initialized,
            )
            .unwrap();

        let result = builder
            .configure(TestState::Draft)
            .permit(TestTrigger::ProcessingRequested, TestState::Manifested);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateTransition { .. })
        ));
    }
}
