//! Configuration errors raised while declaring a machine.

use thiserror::Error;

/// Errors that can occur while building a configuration.
///
/// Every variant is raised by the call that caused it; nothing from the
/// rejected call is applied.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "Trigger '{trigger}' on state '{state}' already targets '{existing}', \
         cannot retarget it to '{requested}'"
    )]
    DuplicateTransition {
        state: String,
        trigger: String,
        existing: String,
        requested: String,
    },

    #[error("Declaring '{child}' a substate of '{parent}' would create a cycle")]
    CyclicHierarchy { child: String, parent: String },

    #[error(
        "State '{child}' is already a substate of '{existing}', \
         cannot also be a substate of '{requested}'"
    )]
    MultipleParent {
        child: String,
        existing: String,
        requested: String,
    },

    #[error("Configuration has already been built and can no longer be modified")]
    ConfigurationFrozen,
}
