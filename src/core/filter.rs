//! Transition filters: which `(from, to)` pairs a guard or callback applies to.

use super::state::State;

/// Optional `from`/`to` scoping for guards and callbacks.
///
/// `None` in a slot matches any state.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionFilter<S: State> {
    pub from: Option<S>,
    pub to: Option<S>,
}

impl<S: State> TransitionFilter<S> {
    /// Matches every transition.
    pub fn any() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Matches transitions leaving `from`, whatever the target.
    pub fn from_state(from: S) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Matches transitions entering `to`, whatever the source.
    pub fn to_state(to: S) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// Matches exactly the edge `from -> to`.
    pub fn between(from: S, to: S) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether this filter applies to the transition `from -> to`.
    pub fn applies_to(&self, from: &S, to: &S) -> bool {
        self.from.as_ref().map_or(true, |f| f == from) && self.to.as_ref().map_or(true, |t| t == to)
    }
}

impl<S: State> Default for TransitionFilter<S> {
    fn default() -> Self {
        Self::any()
    }
}

/// The transition a guard or callback is being invoked for.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionContext<S: State> {
    pub from: S,
    pub to: S,
}

impl<S: State> TransitionContext<S> {
    pub fn new(from: S, to: S) -> Self {
        Self { from, to }
    }
}
