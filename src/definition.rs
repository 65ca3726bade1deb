//! Immutable machine definitions.
//!
//! A [`MachineDefinition`] holds everything declared for one machine type:
//! its states, the initial state, the directed transition graph and the
//! ordered guard and callback lists. It is produced once by
//! [`MachineDefinitionBuilder`](crate::builder::MachineDefinitionBuilder)
//! and shared read-only, usually behind an `Arc`, by every machine instance
//! of that type.

use crate::core::{Callback, Guard, GuardError, State, TransitionContext};
use crate::effects::TransitionError;

/// Validated configuration for one machine type.
pub struct MachineDefinition<S: State, T> {
    pub(crate) states: Vec<S>,
    pub(crate) initial: S,
    pub(crate) successors: Vec<(S, Vec<S>)>,
    pub(crate) guards: Vec<Guard<S, T>>,
    pub(crate) before: Vec<Callback<S, T>>,
    pub(crate) after: Vec<Callback<S, T>>,
}

impl<S: State, T> MachineDefinition<S, T> {
    /// The state assumed when a subject has no transition history.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// Declared states, in declaration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Whether `state` was declared on this definition.
    pub fn is_declared(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// Targets reachable in one step from `from`, as declared.
    ///
    /// Edges declared more than once appear more than once.
    pub fn successors(&self, from: &S) -> &[S] {
        self.successors
            .iter()
            .find(|(source, _)| source == from)
            .map(|(_, targets)| targets.as_slice())
            .unwrap_or(&[])
    }

    /// Every declared edge as `(from, to)` pairs, sources in declaration
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (&S, &S)> {
        self.successors
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Whether `from -> to` is a declared edge.
    pub fn has_transition(&self, from: &S, to: &S) -> bool {
        self.successors(from).contains(to)
    }

    /// Guards applying to `from -> to`, in declaration order.
    pub fn guards_for<'a>(&'a self, from: &'a S, to: &'a S) -> impl Iterator<Item = &'a Guard<S, T>> {
        self.guards.iter().filter(move |g| g.applies_to(from, to))
    }

    /// Before-callbacks applying to `from -> to`, in declaration order.
    pub fn before_callbacks_for<'a>(
        &'a self,
        from: &'a S,
        to: &'a S,
    ) -> impl Iterator<Item = &'a Callback<S, T>> {
        self.before.iter().filter(move |c| c.applies_to(from, to))
    }

    /// After-callbacks applying to `from -> to`, in declaration order.
    pub fn after_callbacks_for<'a>(
        &'a self,
        from: &'a S,
        to: &'a S,
    ) -> impl Iterator<Item = &'a Callback<S, T>> {
        self.after.iter().filter(move |c| c.applies_to(from, to))
    }

    /// Decide whether `subject` may move from `current` to `target`.
    ///
    /// Matching guards run first, in declaration order, and the first one
    /// that rejects or fails aborts validation. Only then is `target`
    /// checked against the successors of `current`. Nothing is mutated.
    pub fn validate(&self, subject: &T, current: &S, target: &S) -> Result<(), TransitionError> {
        let context = TransitionContext::new(current.clone(), target.clone());

        for guard in self.guards_for(current, target) {
            guard.check(subject, &context).map_err(|err| match err {
                GuardError::Rejected { reason } => {
                    tracing::trace!(
                        from = %current.name(),
                        to = %target.name(),
                        %reason,
                        "guard rejected transition"
                    );
                    TransitionError::GuardFailed {
                        from: current.name().to_string(),
                        to: target.name().to_string(),
                        reason,
                    }
                }
                GuardError::Failed(source) => TransitionError::GuardErrored {
                    from: current.name().to_string(),
                    to: target.name().to_string(),
                    source,
                },
            })?;
        }

        if !self.has_transition(current, target) {
            return Err(TransitionError::invalid(current, target));
        }

        Ok(())
    }
}

impl<S: State, T> Clone for MachineDefinition<S, T> {
    fn clone(&self) -> Self {
        Self {
            states: self.states.clone(),
            initial: self.initial.clone(),
            successors: self.successors.clone(),
            guards: self.guards.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

impl<S: State, T> std::fmt::Debug for MachineDefinition<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("states", &self.states)
            .field("initial", &self.initial)
            .field("successors", &self.successors)
            .field("guards", &self.guards.len())
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}
