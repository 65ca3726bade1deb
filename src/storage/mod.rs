//! Storage adapters: durable, ordered transition history for one subject.
//!
//! The machine never caches state. Every read of the current state goes
//! through [`StorageAdapter::last`], and the only write it performs is
//! [`StorageAdapter::create`]. Adapters are scoped to a single subject.
//!
//! The core performs validate-then-append without any locking, so two
//! machines writing to the same subject concurrently can both pass
//! validation against a stale state. Adapters that need to rule this out
//! must serialize appends themselves, for example by rejecting a `create`
//! when a newer record exists and returning [`StorageError::Conflict`].

mod memory;

pub use memory::MemoryAdapter;

use crate::core::{Metadata, State, TransitionRecord};
use thiserror::Error;

/// Errors reported by storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Append-only transition log for one subject.
pub trait StorageAdapter<S: State> {
    /// The most recent record, or `None` if the subject has no history.
    fn last(&self) -> Result<Option<TransitionRecord<S>>, StorageError>;

    /// Every record for the subject, oldest first.
    fn history(&self) -> Result<Vec<TransitionRecord<S>>, StorageError>;

    /// Durably append a record and return it as persisted.
    ///
    /// Must not reorder or overwrite earlier records. The returned record's
    /// `created_at` and `sort_key` are authoritative.
    fn create(
        &self,
        to_state: S,
        metadata: Option<Metadata>,
    ) -> Result<TransitionRecord<S>, StorageError>;
}

impl<S: State, A: StorageAdapter<S> + ?Sized> StorageAdapter<S> for &A {
    fn last(&self) -> Result<Option<TransitionRecord<S>>, StorageError> {
        (**self).last()
    }

    fn history(&self) -> Result<Vec<TransitionRecord<S>>, StorageError> {
        (**self).history()
    }

    fn create(
        &self,
        to_state: S,
        metadata: Option<Metadata>,
    ) -> Result<TransitionRecord<S>, StorageError> {
        (**self).create(to_state, metadata)
    }
}
