//! Declaration errors for machine definitions.

use thiserror::Error;

/// Errors that can occur while declaring a machine definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid state '{state}': {reason}")]
    InvalidState { state: String, reason: String },

    #[error("invalid transition '{from}' -> '{to}': {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Initial state not specified. Declare one with .initial_state(state) before .build()")]
    MissingInitialState,

    #[error("invalid definition config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
