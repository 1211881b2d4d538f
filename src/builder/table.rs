//! Frozen transition table and substate-aware trigger resolution.

use crate::core::{State, Trigger};
use std::collections::HashMap;

/// A single `(source, trigger) -> target` rule declared directly on `source`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRule<S: State, T: Trigger> {
    pub source: S,
    pub trigger: T,
    pub target: S,
}

/// Immutable set of transition rules and substate edges.
///
/// Produced by [`ConfigurationBuilder::build`](super::ConfigurationBuilder::build)
/// and shared read-only by every machine built from it.
#[derive(Clone, Debug)]
pub struct Configuration<S: State, T: Trigger> {
    states: Vec<S>,
    triggers: Vec<T>,
    rules: Vec<TransitionRule<S, T>>,
    targets: HashMap<S, HashMap<T, S>>,
    parents: HashMap<S, S>,
}

impl<S: State, T: Trigger> Default for Configuration<S, T> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            triggers: Vec::new(),
            rules: Vec::new(),
            targets: HashMap::new(),
            parents: HashMap::new(),
        }
    }
}

impl<S: State, T: Trigger> Configuration<S, T> {
    /// Every state mentioned by a rule or substate edge, in first-mention order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Every trigger used by a rule, in first-mention order.
    pub fn triggers(&self) -> &[T] {
        &self.triggers
    }

    /// Direct rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &TransitionRule<S, T>> {
        self.rules.iter()
    }

    /// Target of the rule declared directly on `state` for `trigger`.
    ///
    /// Ancestors are not consulted.
    pub fn direct_target(&self, state: &S, trigger: &T) -> Option<&S> {
        self.targets.get(state).and_then(|by_trigger| by_trigger.get(trigger))
    }

    /// Declared parent of `state`, if it is a substate.
    pub fn parent_of(&self, state: &S) -> Option<&S> {
        self.parents.get(state)
    }

    /// Ancestors of `state`, closest first. `state` itself is not included.
    pub fn ancestors<'a>(&'a self, state: &'a S) -> impl Iterator<Item = &'a S> + 'a {
        std::iter::successors(self.parent_of(state), move |s| self.parent_of(s))
    }

    /// Direct substates of `state`, in first-mention order.
    pub fn substates_of(&self, state: &S) -> Vec<&S> {
        self.states
            .iter()
            .filter(|s| self.parent_of(s) == Some(state))
            .collect()
    }

    /// Resolve `trigger` fired from `current`.
    ///
    /// A rule declared directly on `current` wins; otherwise each ancestor is
    /// tried in turn, closest first. Returns `None` when no state on the
    /// chain permits the trigger.
    pub fn resolve(&self, current: &S, trigger: &T) -> Option<&S> {
        std::iter::once(current)
            .chain(self.ancestors(current))
            .find_map(|state| self.direct_target(state, trigger))
    }

    pub fn can_fire(&self, current: &S, trigger: &T) -> bool {
        self.resolve(current, trigger).is_some()
    }

    /// True when `candidate` is `current` or one of its ancestors.
    pub fn is_in_state(&self, current: &S, candidate: &S) -> bool {
        current == candidate || self.ancestors(current).any(|s| s == candidate)
    }

    /// Triggers that can be fired from `current`, directly or by inheritance.
    ///
    /// Triggers declared on `current` come first, then those inherited from
    /// each ancestor, closest first; each trigger appears once.
    pub fn permitted_triggers(&self, current: &S) -> Vec<&T> {
        let mut permitted: Vec<&T> = Vec::new();
        for state in std::iter::once(current).chain(self.ancestors(current)) {
            for rule in self.rules.iter().filter(|r| &r.source == state) {
                if !permitted.contains(&&rule.trigger) {
                    permitted.push(&rule.trigger);
                }
            }
        }
        permitted
    }

    pub(crate) fn register_state(&mut self, state: &S) {
        if !self.states.contains(state) {
            self.states.push(state.clone());
        }
    }

    pub(crate) fn insert_rule(&mut self, rule: TransitionRule<S, T>) {
        self.register_state(&rule.source);
        self.register_state(&rule.target);
        if !self.triggers.contains(&rule.trigger) {
            self.triggers.push(rule.trigger.clone());
        }
        self.targets
            .entry(rule.source.clone())
            .or_default()
            .insert(rule.trigger.clone(), rule.target.clone());
        self.rules.push(rule);
    }

    pub(crate) fn insert_parent(&mut self, child: S, parent: S) {
        self.register_state(&child);
        self.register_state(&parent);
        self.parents.insert(child, parent);
    }
}
