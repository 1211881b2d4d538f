//! Core identifier traits and history types.
//!
//! This module contains the pieces shared by every other layer:
//! - `State` and `Trigger` identifier traits
//! - Immutable history of fired transitions

mod history;
mod state;

pub use history::{StateHistory, StateTransition};
pub use state::{State, Trigger};
