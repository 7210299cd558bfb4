//! Concrete transition edges.

use crate::core::{Event, State, TransitionId, Trigger};
use crate::machine::error::CallbackError;
use std::fmt;
use std::sync::Arc;

/// Per-transition callback, run after the transition is committed.
pub type TransitionCallback = Arc<dyn Fn() -> Result<(), CallbackError> + Send + Sync>;

/// Machine-wide callback, receives `(from, to)` for every committed transition.
pub type GlobalCallback<S> = Box<dyn Fn(&S, &S) -> Result<(), CallbackError> + Send + Sync>;

/// An immutable `(from, trigger, to)` edge with an optional callback.
///
/// Transitions are only created by the builder, which expands wildcard and list
/// registrations and assigns ids in registration order.
pub struct Transition<S: State> {
    pub(crate) id: TransitionId,
    pub(crate) from: S,
    pub(crate) trigger: Trigger,
    pub(crate) to: S,
    pub(crate) on_transition: Option<TransitionCallback>,
}

impl<S: State> Transition<S> {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn from(&self) -> &S {
        &self.from
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn to(&self) -> &S {
        &self.to
    }

    pub fn has_callback(&self) -> bool {
        self.on_transition.is_some()
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Check if this transition fires for `event` while the machine is in `current` (pure)
    pub fn can_fire(&self, current: &S, event: &Event) -> bool {
        *current == self.from && self.trigger.matches(self.id, event)
    }
}

impl<S: State> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            from: self.from.clone(),
            trigger: self.trigger.clone(),
            to: self.to.clone(),
            on_transition: self.on_transition.as_ref().map(Arc::clone),
        }
    }
}

impl<S: State> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("from", &self.from)
            .field("trigger", &self.trigger)
            .field("to", &self.to)
            .field("on_transition", &self.on_transition.is_some())
            .finish()
    }
}
