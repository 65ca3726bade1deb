//! Guard predicates for controlling state transitions.
//!
//! Guards run before a transition is checked against the declared graph.
//! A guard either lets the transition through, rejects it, or fails with an
//! error of its own; it never mutates the subject.

use super::filter::{TransitionContext, TransitionFilter};
use super::state::State;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error type returned by fallible guard and callback implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors a guard can signal.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The guard rejected the transition. This is the normal "not allowed"
    /// outcome.
    #[error("{reason}")]
    Rejected { reason: String },

    /// The guard itself failed.
    #[error("guard failed: {0}")]
    Failed(#[source] BoxError),
}

impl GuardError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Type alias for guard check functions.
pub type GuardCheck<S, T> =
    Arc<dyn Fn(&T, &TransitionContext<S>) -> Result<(), GuardError> + Send + Sync>;

/// A guard scoped by an optional `from`/`to` filter.
///
/// # Example
///
/// ```rust
/// use transitory::core::{Guard, StateName, TransitionContext, TransitionFilter};
///
/// struct Order {
///     paid: bool,
/// }
///
/// let guard = Guard::new(
///     TransitionFilter::to_state(StateName::from("shipped")),
///     |order: &Order| order.paid,
/// );
///
/// let context = TransitionContext::new(StateName::from("pending"), StateName::from("shipped"));
/// assert!(guard.check(&Order { paid: true }, &context).is_ok());
/// assert!(guard.check(&Order { paid: false }, &context).is_err());
/// ```
pub struct Guard<S: State, T> {
    filter: TransitionFilter<S>,
    check: GuardCheck<S, T>,
}

impl<S: State, T> Guard<S, T> {
    /// Create a guard from a boolean predicate over the subject.
    ///
    /// A `false` result rejects the transition.
    pub fn new<F>(filter: TransitionFilter<S>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        T: 'static,
    {
        Self::fallible(filter, move |subject: &T, context: &TransitionContext<S>| {
            if predicate(subject) {
                Ok(())
            } else {
                Err(GuardError::rejected(format!(
                    "guard rejected transition from '{}' to '{}'",
                    context.from.name(),
                    context.to.name()
                )))
            }
        })
    }

    /// Create a guard that reports its own rejection reason or failure.
    pub fn fallible<F>(filter: TransitionFilter<S>, check: F) -> Self
    where
        F: Fn(&T, &TransitionContext<S>) -> Result<(), GuardError> + Send + Sync + 'static,
    {
        Self {
            filter,
            check: Arc::new(check),
        }
    }

    pub fn filter(&self) -> &TransitionFilter<S> {
        &self.filter
    }

    pub fn applies_to(&self, from: &S, to: &S) -> bool {
        self.filter.applies_to(from, to)
    }

    /// Run the guard against a subject.
    pub fn check(&self, subject: &T, context: &TransitionContext<S>) -> Result<(), GuardError> {
        (self.check)(subject, context)
    }
}

impl<S: State, T> Clone for Guard<S, T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<S: State, T> std::fmt::Debug for Guard<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
