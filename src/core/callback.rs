//! Before/after transition callbacks.

use super::filter::{TransitionContext, TransitionFilter};
use super::guard::BoxError;
use super::state::State;
use std::sync::Arc;
use thiserror::Error;

/// Error raised by a callback.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("{0}")]
    Message(String),

    #[error("{0}")]
    Failed(#[source] BoxError),
}

impl CallbackError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Type alias for callback actions.
pub type CallbackAction<S, T> =
    Arc<dyn Fn(&mut T, &TransitionContext<S>) -> Result<(), CallbackError> + Send + Sync>;

/// A side-effecting action scoped by an optional `from`/`to` filter.
///
/// Callbacks receive the subject mutably so their effects are visible to the
/// caller once the transition returns.
pub struct Callback<S: State, T> {
    filter: TransitionFilter<S>,
    action: CallbackAction<S, T>,
}

impl<S: State, T> Callback<S, T> {
    pub fn new<F>(filter: TransitionFilter<S>, action: F) -> Self
    where
        F: Fn(&mut T, &TransitionContext<S>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Self {
            filter,
            action: Arc::new(action),
        }
    }

    pub fn filter(&self) -> &TransitionFilter<S> {
        &self.filter
    }

    pub fn applies_to(&self, from: &S, to: &S) -> bool {
        self.filter.applies_to(from, to)
    }

    pub fn run(&self, subject: &mut T, context: &TransitionContext<S>) -> Result<(), CallbackError> {
        (self.action)(subject, context)
    }
}

impl<S: State, T> Clone for Callback<S, T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<S: State, T> std::fmt::Debug for Callback<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateName;

    #[test]
    fn callback_mutates_subject() {
        let callback = Callback::new(
            TransitionFilter::<StateName>::any(),
            |log: &mut Vec<String>, ctx| {
                log.push(format!("{} -> {}", ctx.from, ctx.to));
                Ok(())
            },
        );

        let mut log = Vec::new();
        let ctx = TransitionContext::new(StateName::from("a"), StateName::from("b"));
        callback.run(&mut log, &ctx).unwrap();

        assert_eq!(log, vec!["a -> b".to_string()]);
    }

    #[test]
    fn callback_error_is_returned() {
        let callback: Callback<StateName, ()> =
            Callback::new(TransitionFilter::any(), |_, _| Err(CallbackError::msg("mailer down")));

        let ctx = TransitionContext::new(StateName::from("a"), StateName::from("b"));
        let err = callback.run(&mut (), &ctx).unwrap_err();
        assert_eq!(err.to_string(), "mailer down");
    }

    #[test]
    fn cloned_callback_shares_action() {
        let callback = Callback::new(
            TransitionFilter::to_state(StateName::from("b")),
            |count: &mut u32, _| {
                *count += 1;
                Ok(())
            },
        );
        let clone = callback.clone();

        let ctx = TransitionContext::new(StateName::from("a"), StateName::from("b"));
        let mut count = 0;
        callback.run(&mut count, &ctx).unwrap();
        clone.run(&mut count, &ctx).unwrap();

        assert_eq!(count, 2);
        assert!(clone.applies_to(&StateName::from("x"), &StateName::from("b")));
    }
}
