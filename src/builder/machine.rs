//! Builder for machine definitions.

use crate::builder::config::DefinitionConfig;
use crate::builder::error::DefinitionError;
use crate::core::{
    Callback, CallbackError, Guard, GuardError, State, TransitionContext, TransitionFilter,
};
use crate::definition::MachineDefinition;

/// Wildcard marker used in error messages.
const ANY_STATE: &str = "*";

/// Builder for [`MachineDefinition`] with a fluent API.
///
/// Every declaration is checked against what has been declared so far, so
/// states come before the transitions that use them, and transitions come
/// before the guards and callbacks scoped to them.
///
/// # Example
///
/// ```rust
/// use transitory::builder::MachineDefinitionBuilder;
/// use transitory::core::{StateName, TransitionFilter};
///
/// struct Payment {
///     captured: bool,
/// }
///
/// let s = |name: &str| StateName::from(name);
///
/// let definition = MachineDefinitionBuilder::<StateName, Payment>::new()
///     .initial_state(s("authorized"))?
///     .states([s("captured"), s("voided")])
///     .transition(s("authorized"), [s("captured"), s("voided")])?
///     .guard(TransitionFilter::to_state(s("voided")), |p: &Payment| !p.captured)?
///     .build()?;
///
/// assert_eq!(definition.initial_state().as_str(), "authorized");
/// # Ok::<(), transitory::builder::DefinitionError>(())
/// ```
pub struct MachineDefinitionBuilder<S: State, T> {
    states: Vec<S>,
    initial: Option<S>,
    successors: Vec<(S, Vec<S>)>,
    guards: Vec<Guard<S, T>>,
    before: Vec<Callback<S, T>>,
    after: Vec<Callback<S, T>>,
}

impl<S: State, T: 'static> MachineDefinitionBuilder<S, T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            successors: Vec::new(),
            guards: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Seed a builder from a deserialized configuration.
    ///
    /// States and edges are replayed through the same declarations as the
    /// fluent API, so they fail the same way.
    pub fn from_config(config: &DefinitionConfig<S>) -> Result<Self, DefinitionError> {
        let mut builder = Self::new();
        for state in &config.states {
            builder = builder.declare_state(state.name.clone(), state.initial)?;
        }
        for transition in &config.transitions {
            builder = builder.transition(transition.from.clone(), transition.to.to_vec())?;
        }
        Ok(builder)
    }

    /// Seed a builder from a JSON definition.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let config: DefinitionConfig<S> = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    /// Declare a state.
    pub fn state(self, state: S) -> Self {
        let mut builder = self;
        builder.push_state(state);
        builder
    }

    /// Declare several states, in order.
    pub fn states(self, states: impl IntoIterator<Item = S>) -> Self {
        states.into_iter().fold(self, Self::state)
    }

    /// Declare the initial state.
    /// Returns an error if an initial state was already declared.
    pub fn initial_state(self, state: S) -> Result<Self, DefinitionError> {
        self.declare_state(state, true)
    }

    /// Declare a state, optionally as the initial one.
    pub fn declare_state(mut self, state: S, initial: bool) -> Result<Self, DefinitionError> {
        if initial {
            if let Some(existing) = &self.initial {
                return Err(DefinitionError::InvalidState {
                    state: state.name().to_string(),
                    reason: format!("initial state already declared as '{}'", existing.name()),
                });
            }
            self.initial = Some(state.clone());
        }
        self.push_state(state);
        Ok(self)
    }

    /// Declare edges from `from` to each state in `to`.
    ///
    /// Repeated declarations extend the successor list as-is, duplicates
    /// included.
    pub fn transition(
        mut self,
        from: S,
        to: impl IntoIterator<Item = S>,
    ) -> Result<Self, DefinitionError> {
        self.ensure_declared(&from)?;
        let targets: Vec<S> = to.into_iter().collect();
        for target in &targets {
            self.ensure_declared(target)?;
        }

        match self.successors.iter_mut().find(|(source, _)| *source == from) {
            Some((_, existing)) => existing.extend(targets),
            None => self.successors.push((from, targets)),
        }
        Ok(self)
    }

    /// Add a guard from a boolean predicate; `false` rejects the transition.
    pub fn guard<F>(self, filter: TransitionFilter<S>, predicate: F) -> Result<Self, DefinitionError>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.add_guard(Guard::new(filter, predicate))
    }

    /// Add a guard that reports its own rejection reason or failure.
    pub fn guard_with<F>(self, filter: TransitionFilter<S>, check: F) -> Result<Self, DefinitionError>
    where
        F: Fn(&T, &TransitionContext<S>) -> Result<(), GuardError> + Send + Sync + 'static,
    {
        self.add_guard(Guard::fallible(filter, check))
    }

    /// Add a pre-built guard.
    pub fn add_guard(mut self, guard: Guard<S, T>) -> Result<Self, DefinitionError> {
        self.check_filter(guard.filter())?;
        self.guards.push(guard);
        Ok(self)
    }

    /// Add a callback that runs before the record is persisted.
    pub fn before<F>(mut self, filter: TransitionFilter<S>, action: F) -> Result<Self, DefinitionError>
    where
        F: Fn(&mut T, &TransitionContext<S>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.check_filter(&filter)?;
        self.before.push(Callback::new(filter, action));
        Ok(self)
    }

    /// Add a callback that runs after the record is persisted.
    pub fn after<F>(mut self, filter: TransitionFilter<S>, action: F) -> Result<Self, DefinitionError>
    where
        F: Fn(&mut T, &TransitionContext<S>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.check_filter(&filter)?;
        self.after.push(Callback::new(filter, action));
        Ok(self)
    }

    /// Build the definition.
    /// Returns an error if no initial state was declared.
    pub fn build(self) -> Result<MachineDefinition<S, T>, DefinitionError> {
        let initial = self.initial.ok_or(DefinitionError::MissingInitialState)?;

        tracing::debug!(
            initial = %initial.name(),
            states = self.states.len(),
            edges = self.successors.iter().map(|(_, t)| t.len()).sum::<usize>(),
            guards = self.guards.len(),
            before = self.before.len(),
            after = self.after.len(),
            "built machine definition"
        );

        Ok(MachineDefinition {
            states: self.states,
            initial,
            successors: self.successors,
            guards: self.guards,
            before: self.before,
            after: self.after,
        })
    }

    fn push_state(&mut self, state: S) {
        if !self.states.contains(&state) {
            self.states.push(state);
        }
    }

    fn ensure_declared(&self, state: &S) -> Result<(), DefinitionError> {
        if self.states.contains(state) {
            Ok(())
        } else {
            Err(DefinitionError::InvalidState {
                state: state.name().to_string(),
                reason: "state has not been declared".to_string(),
            })
        }
    }

    /// Scoped guards and callbacks must refer to declared states and to a
    /// part of the graph that can actually be traversed.
    fn check_filter(&self, filter: &TransitionFilter<S>) -> Result<(), DefinitionError> {
        if let Some(from) = &filter.from {
            self.ensure_declared(from)?;
        }
        if let Some(to) = &filter.to {
            self.ensure_declared(to)?;
        }

        match (&filter.from, &filter.to) {
            (Some(from), Some(to)) => {
                let exists = self
                    .successors
                    .iter()
                    .any(|(source, targets)| source == from && targets.contains(to));
                if !exists {
                    return Err(DefinitionError::InvalidTransition {
                        from: from.name().to_string(),
                        to: to.name().to_string(),
                        reason: "no such transition has been declared".to_string(),
                    });
                }
            }
            (Some(from), None) => {
                let has_outgoing = self
                    .successors
                    .iter()
                    .any(|(source, targets)| source == from && !targets.is_empty());
                if !has_outgoing {
                    return Err(DefinitionError::InvalidTransition {
                        from: from.name().to_string(),
                        to: ANY_STATE.to_string(),
                        reason: "state has no outgoing transitions".to_string(),
                    });
                }
            }
            (None, Some(to)) => {
                let is_target = self
                    .successors
                    .iter()
                    .any(|(_, targets)| targets.contains(to));
                if !is_target {
                    return Err(DefinitionError::InvalidTransition {
                        from: ANY_STATE.to_string(),
                        to: to.name().to_string(),
                        reason: "state is not the target of any transition".to_string(),
                    });
                }
            }
            (None, None) => {}
        }

        Ok(())
    }
}

impl<S: State, T: 'static> Default for MachineDefinitionBuilder<S, T> {
    fn default() -> Self {
        Self::new()
    }
}
