//! Machine instances: one subject, one storage adapter, one shared definition.

use crate::core::{Metadata, State, TransitionContext, TransitionRecord};
use crate::definition::MachineDefinition;
use crate::effects::transition::{TransitionError, TransitionOutcome};
use crate::storage::{StorageAdapter, StorageError};
use std::sync::Arc;

/// A state machine bound to a subject.
///
/// The machine keeps no state of its own. The current state is read from
/// the storage adapter on every call: the last record's state, or the
/// definition's initial state when there is no history.
///
/// Calls are synchronous and unsynchronized. Two machines bound to the same
/// subject's storage can both validate against the same current state and
/// both append; see [`crate::storage`].
pub struct Machine<S: State, T, A> {
    definition: Arc<MachineDefinition<S, T>>,
    subject: T,
    adapter: A,
}

impl<S, T, A> Machine<S, T, A>
where
    S: State,
    A: StorageAdapter<S>,
{
    /// Bind `subject` and its storage to a shared definition.
    pub fn new(definition: Arc<MachineDefinition<S, T>>, subject: T, adapter: A) -> Self {
        Self {
            definition,
            subject,
            adapter,
        }
    }

    /// The definition this machine runs under.
    pub fn definition(&self) -> &MachineDefinition<S, T> {
        &self.definition
    }

    /// The subject whose lifecycle this machine manages.
    pub fn subject(&self) -> &T {
        &self.subject
    }

    pub fn subject_mut(&mut self) -> &mut T {
        &mut self.subject
    }

    /// The storage adapter holding the subject's history.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Release the subject and the adapter.
    pub fn into_parts(self) -> (T, A) {
        (self.subject, self.adapter)
    }

    /// The subject's current state, derived from storage.
    pub fn current_state(&self) -> Result<S, StorageError> {
        Ok(match self.adapter.last()? {
            Some(record) => record.to_state,
            None => self.definition.initial_state().clone(),
        })
    }

    /// The most recent transition record, if any.
    pub fn last_transition(&self) -> Result<Option<TransitionRecord<S>>, StorageError> {
        self.adapter.last()
    }

    /// Whether the current state is one of `states`.
    pub fn in_state(&self, states: &[S]) -> Result<bool, StorageError> {
        let current = self.current_state()?;
        Ok(states.contains(&current))
    }

    /// Every persisted transition record, oldest first.
    pub fn history(&self) -> Result<Vec<TransitionRecord<S>>, StorageError> {
        self.adapter.history()
    }

    /// Whether a transition to `target` would currently be allowed.
    ///
    /// Guard rejections and undeclared edges answer `Ok(false)`. Any other
    /// failure, such as a guard erroring or storage being unreadable, is
    /// returned as an error. Never appends a record.
    pub fn can_transition_to(&self, target: &S) -> Result<bool, TransitionError> {
        let current = self.current_state()?;
        match self.definition.validate(&self.subject, &current, target) {
            Ok(()) => Ok(true),
            Err(e) if e.is_rejection() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Targets the subject could move to right now, in declaration order and
    /// without duplicates.
    pub fn allowed_transitions(&self) -> Result<Vec<S>, TransitionError> {
        let current = self.current_state()?;
        let mut allowed: Vec<S> = Vec::new();
        for target in self.definition.successors(&current) {
            if allowed.contains(target) {
                continue;
            }
            match self.definition.validate(&self.subject, &current, target) {
                Ok(()) => allowed.push(target.clone()),
                Err(e) if e.is_rejection() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(allowed)
    }

    /// Move the subject to `target`.
    ///
    /// Runs matching guards and checks the edge, then the matching
    /// before-callbacks, then appends a record, then the matching
    /// after-callbacks. A failure before the append leaves storage
    /// untouched and skips everything after it. A failing after-callback
    /// does not undo the append: the error is
    /// [`TransitionError::AfterCallbackFailed`] and the record stays in
    /// history.
    ///
    /// Returns the current state as re-read from storage. If that read fails
    /// the error is [`TransitionError::RereadFailed`], which still reports
    /// the record as persisted.
    pub fn transition_to(
        &mut self,
        target: S,
        metadata: Option<Metadata>,
    ) -> Result<S, TransitionError> {
        let current = self.current_state()?;
        self.definition.validate(&self.subject, &current, &target)?;

        tracing::debug!(
            from = %current.name(),
            to = %target.name(),
            "transition validated"
        );

        let context = TransitionContext::new(current, target);
        let definition = &self.definition;
        let subject = &mut self.subject;

        for callback in definition.before_callbacks_for(&context.from, &context.to) {
            if let Err(source) = callback.run(subject, &context) {
                tracing::warn!(
                    from = %context.from.name(),
                    to = %context.to.name(),
                    error = %source,
                    "before-transition callback failed, transition aborted"
                );
                return Err(TransitionError::BeforeCallbackFailed {
                    from: context.from.name().to_string(),
                    to: context.to.name().to_string(),
                    source,
                });
            }
        }

        let record = self
            .adapter
            .create(context.to.clone(), metadata)
            .map_err(|e| {
                tracing::warn!(
                    from = %context.from.name(),
                    to = %context.to.name(),
                    error = %e,
                    "failed to persist transition"
                );
                e
            })?;

        tracing::debug!(
            from = %context.from.name(),
            to = %record.to_state.name(),
            sort_key = record.sort_key,
            "transition persisted"
        );

        for callback in definition.after_callbacks_for(&context.from, &context.to) {
            if let Err(source) = callback.run(subject, &context) {
                tracing::warn!(
                    from = %context.from.name(),
                    to = %context.to.name(),
                    error = %source,
                    "after-transition callback failed; transition remains recorded"
                );
                return Err(TransitionError::AfterCallbackFailed {
                    from: context.from.name().to_string(),
                    to: context.to.name().to_string(),
                    source,
                });
            }
        }

        self.current_state().map_err(|source| {
            tracing::warn!(
                from = %context.from.name(),
                to = %context.to.name(),
                error = %source,
                "transition recorded but state could not be re-read"
            );
            TransitionError::RereadFailed {
                from: context.from.name().to_string(),
                to: context.to.name().to_string(),
                source,
            }
        })
    }

    /// Non-raising form of [`transition_to`](Self::transition_to).
    ///
    /// Every failure kind becomes a [`TransitionOutcome`] variant.
    pub fn attempt_transition_to(
        &mut self,
        target: S,
        metadata: Option<Metadata>,
    ) -> TransitionOutcome<S> {
        self.transition_to(target, metadata).into()
    }
}

impl<S: State, T: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for Machine<S, T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("definition", &self.definition)
            .field("subject", &self.subject)
            .field("adapter", &self.adapter)
            .finish()
    }
}
