//! Checkpoint and restore of a subject's transition history.
//!
//! A checkpoint is a serializable snapshot of one machine instance's
//! history together with the state it implies. Before a checkpoint is
//! restored it is verified against the definition it will run under, and
//! every disagreement is reported at once rather than one at a time.

use crate::core::{State, TransitionHistory};
use crate::definition::MachineDefinition;
use crate::effects::Machine;
use crate::storage::{MemoryAdapter, StorageAdapter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use uuid::Uuid;

pub mod error;

pub use error::{CheckpointError, CheckpointViolation};

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a subject's transition history.
/// Does NOT include guards or callbacks (not serializable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Initial state of the machine the history was recorded under
    pub initial_state: S,

    /// State implied by the history
    pub current_state: S,

    /// Complete transition history
    pub history: TransitionHistory<S>,
}

impl<S: State> Checkpoint<S> {
    /// Snapshot a machine's history.
    ///
    /// History is read once, and the current state is derived from that
    /// same read.
    pub fn capture<T, A>(machine: &Machine<S, T, A>) -> Result<Self, CheckpointError>
    where
        A: StorageAdapter<S>,
    {
        let history = TransitionHistory::from(machine.history()?);
        let initial_state = machine.definition().initial_state().clone();
        let current_state = history.current_state(&initial_state).clone();

        Ok(Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            initial_state,
            current_state,
            history,
        })
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Parse a checkpoint, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Check the history against a definition, accumulating ALL violations.
    pub fn verify<T>(
        &self,
        definition: &MachineDefinition<S, T>,
    ) -> Validation<(), NonEmptyVec<CheckpointViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<CheckpointViolation>>> = Vec::new();

        if &self.initial_state != definition.initial_state() {
            checks.push(Validation::fail(CheckpointViolation::InitialStateMismatch {
                expected: definition.initial_state().name().to_string(),
                found: self.initial_state.name().to_string(),
            }));
        }

        let mut previous = definition.initial_state();
        let mut previous_sort_key = None;
        for (position, record) in self.history.records().iter().enumerate() {
            let to = &record.to_state;
            if !definition.is_declared(to) {
                checks.push(Validation::fail(CheckpointViolation::UndeclaredState {
                    state: to.name().to_string(),
                    position,
                }));
            } else if !definition.has_transition(previous, to) {
                checks.push(Validation::fail(CheckpointViolation::IllegalTransition {
                    from: previous.name().to_string(),
                    to: to.name().to_string(),
                    position,
                }));
            }

            if previous_sort_key.is_some_and(|key| record.sort_key <= key) {
                checks.push(Validation::fail(CheckpointViolation::SortKeyOutOfOrder {
                    sort_key: record.sort_key,
                    position,
                }));
            }

            previous = to;
            previous_sort_key = Some(record.sort_key);
        }

        let derived = self.history.current_state(definition.initial_state());
        if &self.current_state != derived {
            checks.push(Validation::fail(CheckpointViolation::CurrentStateMismatch {
                recorded: self.current_state.name().to_string(),
                derived: derived.name().to_string(),
            }));
        }

        checks.push(Validation::success(()));
        Validation::all_vec(checks).map(|_| ())
    }

    /// Verify the checkpoint and load its history into a fresh in-memory
    /// adapter.
    pub fn restore<T>(
        &self,
        definition: &MachineDefinition<S, T>,
    ) -> Result<MemoryAdapter<S>, CheckpointError> {
        self.check_version()?;

        match self.verify(definition) {
            Validation::Success(_) => {
                tracing::debug!(
                    checkpoint = %self.id,
                    records = self.history.len(),
                    current = %self.current_state.name(),
                    "restored checkpoint"
                );
                Ok(MemoryAdapter::from_records(
                    self.history.records().to_vec(),
                ))
            }
            Validation::Failure(violations) => {
                let message = violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(CheckpointError::ValidationFailed(message))
            }
        }
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
}
