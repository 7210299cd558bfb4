//! Builder for registering transitions.

use crate::builder::error::BuildError;
use crate::core::{State, Trigger};
use crate::machine::{CallbackError, TransitionCallback};
use std::sync::Arc;

/// Source side of a registration: one state, several states, or every
/// declared state.
#[derive(Clone, Debug, PartialEq)]
pub enum Source<S: State> {
    State(S),
    States(Vec<S>),
    /// Every declared state, self-loop included.
    Any,
}

impl<S: State> Source<S> {
    /// Expand into concrete source states, in declaration or list order.
    pub fn expand(&self) -> Vec<S> {
        match self {
            Self::State(state) => vec![state.clone()],
            Self::States(states) => states.clone(),
            Self::Any => S::all().to_vec(),
        }
    }
}

impl<S: State> From<S> for Source<S> {
    fn from(state: S) -> Self {
        Self::State(state)
    }
}

impl<S: State> From<Vec<S>> for Source<S> {
    fn from(states: Vec<S>) -> Self {
        Self::States(states)
    }
}

impl<S: State, const N: usize> From<[S; N]> for Source<S> {
    fn from(states: [S; N]) -> Self {
        Self::States(states.into())
    }
}

/// One trigger or several; several triggers register one transition each.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Triggers(pub Vec<Trigger>);

impl From<Trigger> for Triggers {
    fn from(trigger: Trigger) -> Self {
        Self(vec![trigger])
    }
}

impl From<Vec<Trigger>> for Triggers {
    fn from(triggers: Vec<Trigger>) -> Self {
        Self(triggers)
    }
}

impl<const N: usize> From<[Trigger; N]> for Triggers {
    fn from(triggers: [Trigger; N]) -> Self {
        Self(triggers.into())
    }
}

/// A registration ready to be expanded into concrete transitions.
pub(crate) struct Registration<S: State> {
    pub from: Source<S>,
    pub triggers: Vec<Trigger>,
    pub to: S,
    pub on_transition: Option<TransitionCallback>,
}

impl<S: State> Registration<S> {
    /// Cross product of source states and triggers, sources outermost.
    pub fn edges(&self) -> impl Iterator<Item = (S, Trigger)> + '_ {
        self.from.expand().into_iter().flat_map(move |from| {
            self.triggers
                .iter()
                .map(move |trigger| (from.clone(), trigger.clone()))
        })
    }
}

/// Builder for registering transitions with a fluent API.
///
/// # Example
///
/// ```
/// use autostate::builder::{StateMachineBuilder, TransitionBuilder};
/// use autostate::core::Trigger;
/// use autostate::state_enum;
///
/// state_enum! {
///     enum Light {
///         Off,
///         On,
///     }
/// }
///
/// let builder = StateMachineBuilder::<Light>::new()
///     .transition(
///         TransitionBuilder::new()
///             .any()
///             .trigger(Trigger::state_on("binary_sensor.motion"))
///             .to(Light::On)
///             .on_transition(|| Ok(())),
///     )
///     .unwrap();
///
/// assert_eq!(builder.transition_count(), 2);
/// ```
pub struct TransitionBuilder<S: State> {
    from: Option<Source<S>>,
    triggers: Vec<Trigger>,
    to: Option<S>,
    on_transition: Option<TransitionCallback>,
}

impl<S: State> TransitionBuilder<S> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            triggers: Vec::new(),
            to: None,
            on_transition: None,
        }
    }

    /// Set the source state(s) (required).
    pub fn from(mut self, source: impl Into<Source<S>>) -> Self {
        self.from = Some(source.into());
        self
    }

    /// Leave from every declared state.
    pub fn any(mut self) -> Self {
        self.from = Some(Source::Any);
        self
    }

    /// Add a trigger (at least one required).
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Add several triggers.
    pub fn triggers(mut self, triggers: impl Into<Triggers>) -> Self {
        self.triggers.extend(triggers.into().0);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Run `callback` whenever one of these transitions is committed.
    pub fn on_transition<F>(mut self, callback: F) -> Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_transition = Some(Arc::new(callback));
        self
    }

    pub(crate) fn finish(self) -> Result<Registration<S>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        if self.triggers.is_empty() {
            return Err(BuildError::MissingTrigger);
        }

        Ok(Registration {
            from,
            triggers: self.triggers,
            to,
            on_transition: self.on_transition,
        })
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
