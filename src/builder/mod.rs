//! Builder API for declaring hierarchical state machines.
//!
//! A [`ConfigurationBuilder`] collects transition rules and substate edges,
//! rejecting conflicting declarations as they arrive. Building it yields a
//! frozen, shareable [`Configuration`] that resolves triggers against the
//! substate hierarchy.

pub mod configuration;
pub mod error;
pub mod macros;
pub mod table;

pub use configuration::{ConfigurationBuilder, StateConfigurer};
pub use error::ConfigError;
pub use table::{Configuration, TransitionRule};
