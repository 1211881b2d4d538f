//! Checkpoint and resume for machine instances.
//!
//! A checkpoint captures what a machine owns: its initial state, current
//! state and history. The configuration itself is never serialized; a
//! checkpoint is resumed against a configuration the caller rebuilds.

use crate::builder::Configuration;
use crate::core::{State, StateHistory, Trigger};
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State, T: Trigger> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub initial_state: S,

    pub current_state: S,

    /// Complete transition history
    pub history: StateHistory<S, T>,
}

impl<S: State, T: Trigger> Checkpoint<S, T> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }

    /// Check that the recorded history could have been produced by `config`
    /// and ends in `current_state`.
    fn validate(&self, config: &Configuration<S, T>) -> Result<(), CheckpointError> {
        let mut expected_from = &self.initial_state;
        for transition in self.history.transitions() {
            if &transition.from != expected_from {
                return Err(CheckpointError::ValidationFailed(format!(
                    "transition from '{}' does not follow '{}'",
                    transition.from.name(),
                    expected_from.name()
                )));
            }
            if config.resolve(&transition.from, &transition.trigger) != Some(&transition.to) {
                return Err(CheckpointError::ValidationFailed(format!(
                    "'{}' on '{}' does not lead to '{}'",
                    transition.trigger.name(),
                    transition.from.name(),
                    transition.to.name()
                )));
            }
            expected_from = &transition.to;
        }

        if expected_from != &self.current_state {
            return Err(CheckpointError::ValidationFailed(format!(
                "history ends in '{}' but current state is '{}'",
                expected_from.name(),
                self.current_state.name()
            )));
        }
        Ok(())
    }
}

impl<S: State, T: Trigger> StateMachine<S, T> {
    /// Snapshot this machine's state and history.
    pub fn checkpoint(&self) -> Checkpoint<S, T> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            initial_state: self.initial.clone(),
            current_state: self.current.clone(),
            history: self.history.clone(),
        }
    }

    /// Rebuild a machine from a checkpoint.
    ///
    /// Observers are not part of a checkpoint and must be registered again.
    pub fn resume(
        config: Arc<Configuration<S, T>>,
        checkpoint: Checkpoint<S, T>,
    ) -> Result<Self, CheckpointError> {
        checkpoint.check_version()?;
        checkpoint.validate(&config)?;

        info!(
            checkpoint = %checkpoint.id,
            state = checkpoint.current_state.name(),
            transitions = checkpoint.history.len(),
            "resumed from checkpoint"
        );
        Ok(Self::with_history(
            config,
            checkpoint.initial_state,
            checkpoint.current_state,
            checkpoint.history,
        ))
    }
}
