//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::{Registration, Source, TransitionBuilder, Triggers};
use crate::builder::validation::validate;
use crate::core::{State, TransitionId, Trigger, DEFAULT_HISTORY_LIMIT};
use crate::machine::{
    CallbackError, GlobalCallback, Host, MachineParts, StateMachine, Transition,
};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// Registration only happens here: once built, a machine's transition table
/// is closed.
pub struct StateMachineBuilder<S: State> {
    initial: Option<S>,
    mirror_entity: Option<String>,
    transitions: Vec<Transition<S>>,
    on_transition: Option<GlobalCallback<S>>,
    history_limit: usize,
    check_on_entry: bool,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            mirror_entity: None,
            transitions: Vec::new(),
            on_transition: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            check_on_entry: false,
        }
    }

    /// Set the initial state. Defaults to the first declared state.
    ///
    /// A valid value in the mirror entity takes precedence at start.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Mirror the current state into `entity` and resume from it at start.
    pub fn mirror_entity(mut self, entity: impl Into<String>) -> Self {
        self.mirror_entity = Some(entity.into());
        self
    }

    /// Number of committed transitions kept in memory.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Fire entity triggers whose condition already holds when a state is entered.
    pub fn check_on_entry(mut self, enabled: bool) -> Self {
        self.check_on_entry = enabled;
        self
    }

    /// Set the machine-wide callback. Only one is kept; the last call wins.
    pub fn on_transition<F>(mut self, callback: F) -> Self
    where
        F: Fn(&S, &S) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_transition = Some(Box::new(callback));
        self
    }

    /// Register a single transition.
    pub fn add_transition(self, from: S, trigger: Trigger, to: S) -> Self {
        self.add_transitions(from, trigger, to)
    }

    /// Register a single transition with its own callback.
    pub fn add_transition_with<F>(self, from: S, trigger: Trigger, to: S, callback: F) -> Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.add_transitions_with(from, trigger, to, callback)
    }

    /// Register one transition per (source state, trigger) pair.
    ///
    /// `from` may be a state, a list of states or [`Source::Any`]; `triggers`
    /// a trigger or a list of triggers.
    pub fn add_transitions(
        mut self,
        from: impl Into<Source<S>>,
        triggers: impl Into<Triggers>,
        to: S,
    ) -> Self {
        self.register(Registration {
            from: from.into(),
            triggers: triggers.into().0,
            to,
            on_transition: None,
        });
        self
    }

    /// Like [`add_transitions`](Self::add_transitions), with a callback shared
    /// by every resulting transition.
    pub fn add_transitions_with<F>(
        mut self,
        from: impl Into<Source<S>>,
        triggers: impl Into<Triggers>,
        to: S,
        callback: F,
    ) -> Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.register(Registration {
            from: from.into(),
            triggers: triggers.into().0,
            to,
            on_transition: Some(Arc::new(callback)),
        });
        self
    }

    /// Register transitions using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        let registration = builder.finish()?;
        self.register(registration);
        Ok(self)
    }

    /// Number of concrete transitions registered so far.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    fn register(&mut self, registration: Registration<S>) {
        for (from, trigger) in registration.edges() {
            let id = TransitionId(self.transitions.len());
            self.transitions.push(Transition {
                id,
                from,
                trigger,
                to: registration.to.clone(),
                on_transition: registration.on_transition.clone(),
            });
        }
    }

    /// Build the state machine.
    /// Returns an error if no states are declared or the configuration is invalid.
    pub fn build<H: Host>(self) -> Result<StateMachine<S, H>, BuildError> {
        let first = S::all().first().ok_or(BuildError::NoStates)?;
        let initial = self.initial.unwrap_or_else(|| first.clone());

        validate(&initial, &self.transitions, self.mirror_entity.as_deref())
            .map_err(BuildError::Invalid)?;

        Ok(StateMachine::from_parts(MachineParts {
            initial,
            transitions: self.transitions,
            mirror_entity: self.mirror_entity,
            on_transition: self.on_transition,
            history_limit: self.history_limit,
            check_on_entry: self.check_on_entry,
        }))
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
