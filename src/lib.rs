//! Substate: a hierarchical state machine library
//!
//! Machines are declared once as a frozen [`Configuration`] of transition
//! rules and substate edges, then any number of [`StateMachine`] instances
//! are run against it. A trigger fired from a substate that does not handle
//! it is looked up on the substate's ancestors, closest first.
//!
//! # Core Concepts
//!
//! - **State** / **Trigger**: opaque identifiers, usually fieldless enums
//! - **Configuration**: permitted `(state, trigger) -> target` rules plus
//!   the `child -> parent` substate relation
//! - **StateMachine**: a current state, its history, and observers
//!
//! # Example
//!
//! ```rust
//! use substate::{state_enum, trigger_enum, ConfigurationBuilder, StateMachine};
//!
//! state_enum! {
//!     enum Shipment {
//!         CollectionScheduled,
//!         ShippingDocsCreated,
//!         LabelsCreated,
//!         CancellationCompleted,
//!     }
//! }
//!
//! trigger_enum! {
//!     enum Request {
//!         LabelGenerationRequested,
//!         ShipmentCancellationRequested,
//!     }
//! }
//!
//! let mut builder = ConfigurationBuilder::new();
//! builder
//!     .configure(Shipment::CollectionScheduled)
//!     .permit(Request::LabelGenerationRequested, Shipment::LabelsCreated)?;
//! builder
//!     .configure(Shipment::ShippingDocsCreated)
//!     .permit(Request::ShipmentCancellationRequested, Shipment::CancellationCompleted)?;
//! builder
//!     .configure(Shipment::LabelsCreated)
//!     .substate_of(Shipment::ShippingDocsCreated)?;
//! let config = builder.build()?;
//!
//! let mut machine = StateMachine::new(config, Shipment::CollectionScheduled);
//! machine.fire(Request::LabelGenerationRequested)?;
//! assert!(machine.is_in_state(&Shipment::ShippingDocsCreated));
//!
//! machine.fire(Request::ShipmentCancellationRequested)?;
//! assert_eq!(machine.current_state(), &Shipment::CancellationCompleted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod graph;
pub mod machine;

// Re-export commonly used types
pub use builder::{ConfigError, Configuration, ConfigurationBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{State, StateHistory, StateTransition, Trigger};
pub use machine::{StateMachine, TransitionError, TransitionObserver};
