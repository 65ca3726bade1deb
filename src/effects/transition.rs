//! Transition errors and outcomes.

use crate::core::{BoxError, CallbackError, State};
use crate::storage::StorageError;

/// Errors that can occur while validating or executing a transition.
///
/// States are carried by name so the error type is independent of the
/// machine's state type.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("guard blocked transition from '{from}' to '{to}': {reason}")]
    GuardFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("guard errored on transition from '{from}' to '{to}': {source}")]
    GuardErrored {
        from: String,
        to: String,
        #[source]
        source: BoxError,
    },

    #[error("before-transition callback failed on '{from}' -> '{to}': {source}")]
    BeforeCallbackFailed {
        from: String,
        to: String,
        #[source]
        source: CallbackError,
    },

    /// The record was persisted; only the notification afterwards failed.
    #[error("after-transition callback failed on '{from}' -> '{to}' (transition was recorded): {source}")]
    AfterCallbackFailed {
        from: String,
        to: String,
        #[source]
        source: CallbackError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The record was persisted and after-callbacks ran, but the state could
    /// not be read back.
    #[error("transition '{from}' -> '{to}' was recorded but re-reading state failed: {source}")]
    RereadFailed {
        from: String,
        to: String,
        #[source]
        source: StorageError,
    },
}

impl TransitionError {
    /// Whether this is a normal "transition not allowed" outcome rather than
    /// a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TransitionError::InvalidTransition { .. } | TransitionError::GuardFailed { .. }
        )
    }

    /// Whether the transition record was persisted despite this error.
    pub fn is_persisted(&self) -> bool {
        matches!(
            self,
            TransitionError::AfterCallbackFailed { .. } | TransitionError::RereadFailed { .. }
        )
    }

    pub(crate) fn invalid<S: State>(from: &S, to: &S) -> Self {
        Self::InvalidTransition {
            from: from.name().to_string(),
            to: to.name().to_string(),
        }
    }
}

/// Result of a non-raising transition attempt.
///
/// Every failure kind of [`Machine::transition_to`](crate::Machine::transition_to)
/// maps to its own variant, so callers decide how much of the distinction to
/// keep.
#[derive(Debug)]
pub enum TransitionOutcome<S: State> {
    /// The record was persisted and every callback succeeded.
    Transitioned(S),

    /// A guard rejected the transition. Nothing was persisted.
    GuardRejected(TransitionError),

    /// A guard failed with its own error. Nothing was persisted.
    GuardErrored(TransitionError),

    /// The target is not a successor of the current state. Nothing was
    /// persisted.
    InvalidTransition(TransitionError),

    /// A before-callback failed. Nothing was persisted.
    BeforeCallbackFailed(TransitionError),

    /// Reading or appending to storage failed.
    PersistenceFailed(TransitionError),

    /// The record was persisted but an after-callback failed.
    AfterCallbackFailed(TransitionError),

    /// The record was persisted but the resulting state could not be read
    /// back from storage.
    RereadFailed(TransitionError),
}

impl<S: State> TransitionOutcome<S> {
    /// True only when the transition completed as validated.
    ///
    /// An after-callback failure reports `false` here even though the record
    /// exists; use [`is_persisted`](Self::is_persisted) to tell them apart.
    pub fn is_success(&self) -> bool {
        matches!(self, TransitionOutcome::Transitioned(_))
    }

    pub fn is_persisted(&self) -> bool {
        matches!(
            self,
            TransitionOutcome::Transitioned(_)
                | TransitionOutcome::AfterCallbackFailed(_)
                | TransitionOutcome::RereadFailed(_)
        )
    }

    pub fn state(&self) -> Option<&S> {
        match self {
            TransitionOutcome::Transitioned(state) => Some(state),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TransitionError> {
        match self {
            TransitionOutcome::Transitioned(_) => None,
            TransitionOutcome::GuardRejected(e)
            | TransitionOutcome::GuardErrored(e)
            | TransitionOutcome::InvalidTransition(e)
            | TransitionOutcome::BeforeCallbackFailed(e)
            | TransitionOutcome::PersistenceFailed(e)
            | TransitionOutcome::AfterCallbackFailed(e)
            | TransitionOutcome::RereadFailed(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<S, TransitionError> {
        match self {
            TransitionOutcome::Transitioned(state) => Ok(state),
            TransitionOutcome::GuardRejected(e)
            | TransitionOutcome::GuardErrored(e)
            | TransitionOutcome::InvalidTransition(e)
            | TransitionOutcome::BeforeCallbackFailed(e)
            | TransitionOutcome::PersistenceFailed(e)
            | TransitionOutcome::AfterCallbackFailed(e)
            | TransitionOutcome::RereadFailed(e) => Err(e),
        }
    }
}

impl<S: State> From<Result<S, TransitionError>> for TransitionOutcome<S> {
    fn from(result: Result<S, TransitionError>) -> Self {
        match result {
            Ok(state) => TransitionOutcome::Transitioned(state),
            Err(e) => match e {
                TransitionError::GuardFailed { .. } => TransitionOutcome::GuardRejected(e),
                TransitionError::GuardErrored { .. } => TransitionOutcome::GuardErrored(e),
                TransitionError::InvalidTransition { .. } => TransitionOutcome::InvalidTransition(e),
                TransitionError::BeforeCallbackFailed { .. } => {
                    TransitionOutcome::BeforeCallbackFailed(e)
                }
                TransitionError::Storage(_) => TransitionOutcome::PersistenceFailed(e),
                TransitionError::AfterCallbackFailed { .. } => {
                    TransitionOutcome::AfterCallbackFailed(e)
                }
                TransitionError::RereadFailed { .. } => TransitionOutcome::RereadFailed(e),
            },
        }
    }
}
