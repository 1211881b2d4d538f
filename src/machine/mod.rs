//! Running machine instances.
//!
//! A [`StateMachine`] owns its current state and history and consults a
//! shared [`Configuration`](crate::builder::Configuration) to decide whether
//! a fired trigger is legal:
//!
//! - **Direct rules** on the current state win
//! - **Inherited rules** are looked up on each superstate in turn
//! - **Observers** are told about every successful transition

mod error;
mod observer;
mod state_machine;

pub use error::TransitionError;
pub use observer::{TracingObserver, TransitionObserver};
pub use state_machine::StateMachine;
