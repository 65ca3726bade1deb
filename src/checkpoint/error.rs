//! Checkpoint error types.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Checkpoint history does not fit the machine definition
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),

    /// Reading history from the storage adapter failed
    #[error("Checkpoint capture failed: {0}")]
    Storage(#[from] StorageError),
}

/// A single way a checkpoint's history disagrees with a definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckpointViolation {
    #[error("initial state '{found}' does not match definition's '{expected}'")]
    InitialStateMismatch { expected: String, found: String },

    #[error("record {position} enters undeclared state '{state}'")]
    UndeclaredState { state: String, position: usize },

    #[error("record {position} moves '{from}' -> '{to}', which is not a declared transition")]
    IllegalTransition {
        from: String,
        to: String,
        position: usize,
    },

    #[error("record {position} has sort key {sort_key}, not greater than the previous one")]
    SortKeyOutOfOrder { sort_key: u64, position: usize },

    #[error("current state '{recorded}' does not match history, which ends in '{derived}'")]
    CurrentStateMismatch { recorded: String, derived: String },
}
