//! State machine that reacts to host events.

use crate::core::{Event, State, StateHistory, StateTransition, TransitionId};
use crate::machine::error::{CallbackError, MachineError};
use crate::machine::graph;
use crate::machine::host::Host;
use crate::machine::router::EventRouter;
use crate::machine::timer::TimerManager;
use crate::machine::transition::{GlobalCallback, Transition};
use chrono::Utc;
use std::marker::PhantomData;

/// Result of handling a single event
#[derive(Clone, Debug, PartialEq)]
pub enum StepResult<S: State> {
    /// A transition fired. With entry checks enabled the machine may have moved
    /// on further; see [`StateMachine::current_state`].
    Transitioned {
        from: S,
        to: S,
        transition: TransitionId,
    },

    /// No transition matched; nothing changed
    Ignored,
}

impl<S: State> StepResult<S> {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Pieces assembled by [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
pub(crate) struct MachineParts<S: State> {
    pub initial: S,
    pub transitions: Vec<Transition<S>>,
    pub mirror_entity: Option<String>,
    pub on_transition: Option<GlobalCallback<S>>,
    pub history_limit: usize,
    pub check_on_entry: bool,
}

/// Event-driven state machine.
///
/// The machine processes one event to completion, callbacks included, before
/// the next one. It never blocks and holds no locks; the host owns the event
/// loop and hands itself in by `&mut` whenever the machine needs a side effect.
pub struct StateMachine<S: State, H: Host> {
    current: S,
    transitions: Vec<Transition<S>>,
    mirror_entity: Option<String>,
    on_transition: Option<GlobalCallback<S>>,
    router: EventRouter,
    timers: TimerManager<H::TimerHandle>,
    history: StateHistory<S>,
    check_on_entry: bool,
    started: bool,
    _host: PhantomData<fn(&mut H)>,
}

impl<S: State, H: Host> StateMachine<S, H> {
    pub(crate) fn from_parts(parts: MachineParts<S>) -> Self {
        let router = EventRouter::from_transitions(&parts.transitions);
        Self {
            current: parts.initial,
            transitions: parts.transitions,
            mirror_entity: parts.mirror_entity,
            on_transition: parts.on_transition,
            router,
            timers: TimerManager::new(),
            history: StateHistory::with_limit(parts.history_limit),
            check_on_entry: parts.check_on_entry,
            started: false,
            _host: PhantomData,
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// Concrete transitions in registration order (pure)
    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    pub fn mirror_entity(&self) -> Option<&str> {
        self.mirror_entity.as_deref()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of timers currently scheduled with the host.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Entities the machine listens to.
    pub fn entities(&self) -> impl Iterator<Item = &str> + '_ {
        self.router.entities()
    }

    /// Transition graph in DOT format. Never looks at the current state.
    pub fn to_dot(&self) -> String {
        graph::to_dot(&self.transitions)
    }

    /// Link to an online renderer showing the transition graph.
    pub fn graph_link(&self) -> String {
        graph::renderer_link(&self.to_dot())
    }

    /// Log a link to the rendered transition graph at info level.
    pub fn log_graph(&self) {
        tracing::info!(link = %self.graph_link(), "transition graph");
    }

    /// Bring the machine online.
    ///
    /// Resolves the initial state (a valid mirrored value wins over the
    /// configured one), writes it back to the mirror, subscribes to every
    /// entity the triggers reference and arms the timers of the initial state.
    pub fn start(&mut self, host: &mut H) -> Result<(), MachineError> {
        if self.started {
            return Err(MachineError::AlreadyStarted);
        }

        if let Some(entity) = &self.mirror_entity {
            match host.get_state(entity) {
                Some(value) => match S::from_name(&value) {
                    Some(state) => self.current = state,
                    None => tracing::warn!(
                        entity = entity.as_str(),
                        value = value.as_str(),
                        fallback = self.current.name(),
                        "unrecognized state in mirrored entity"
                    ),
                },
                None => tracing::debug!(
                    entity = entity.as_str(),
                    "mirrored entity has no value yet"
                ),
            }
            host.set_state(entity, self.current.name());
        }

        self.router.subscribe(host)?;
        self.timers.arm(host, &self.transitions, &self.current)?;
        self.started = true;
        tracing::info!(
            state = self.current.name(),
            transitions = self.transitions.len(),
            "state machine started"
        );

        if self.check_on_entry {
            self.settle(host)?;
        }
        Ok(())
    }

    /// Process one event delivered by the host.
    ///
    /// Events for entities the machine did not subscribe to, stale timer
    /// expiries and events no transition matches are ignored.
    pub fn handle_event(
        &mut self,
        host: &mut H,
        event: &Event,
    ) -> Result<StepResult<S>, MachineError> {
        if !self.started {
            return Err(MachineError::NotStarted);
        }
        if !self.router.accepts(event) {
            tracing::trace!(entity = event.entity(), "event for unsubscribed entity");
            return Ok(StepResult::Ignored);
        }

        let Some(id) = self.evaluate(event) else {
            tracing::trace!(
                event = event.event_type(),
                state = self.current.name(),
                "no transition matched"
            );
            return Ok(StepResult::Ignored);
        };

        if let Event::TimerExpired(token) = event {
            self.timers.retire(token);
        }

        let from = self.execute(host, id)?;
        let to = self.transitions[id.0].to().clone();
        let callbacks = self.run_callbacks(id, &from, &to);
        // A failed callback still leaves the new state to be settled.
        let settled = if self.check_on_entry {
            self.settle(host)
        } else {
            Ok(())
        };
        callbacks?;
        settled?;
        Ok(StepResult::Transitioned {
            from,
            to,
            transition: id,
        })
    }

    /// Select the transition `event` fires from the current state (pure).
    ///
    /// Transitions are scanned in registration order and the first match wins.
    /// Timer expiries whose timer is no longer pending never match.
    pub fn evaluate(&self, event: &Event) -> Option<TransitionId> {
        if let Event::TimerExpired(token) = event {
            if !self.timers.is_live(token) {
                return None;
            }
        }
        self.transitions
            .iter()
            .find(|t| t.can_fire(&self.current, event))
            .map(Transition::id)
    }

    /// Commit a transition. Returns the state that was left.
    ///
    /// Order: cancel timers, set the current state, write the mirror, record
    /// history, arm the new state's timers. Callbacks run afterwards through
    /// [`run_callbacks`](Self::run_callbacks), so a failing callback never
    /// leaves the machine half way.
    fn execute(&mut self, host: &mut H, id: TransitionId) -> Result<S, MachineError> {
        let transition = &self.transitions[id.0];
        let to = transition.to().clone();
        let label = transition.trigger().to_string();

        self.timers.cancel_all(host);
        let from = std::mem::replace(&mut self.current, to.clone());
        if let Some(entity) = &self.mirror_entity {
            host.set_state(entity, to.name());
        }
        tracing::debug!(
            from = from.name(),
            to = to.name(),
            trigger = label.as_str(),
            "transition"
        );
        self.history.record(StateTransition {
            from: from.clone(),
            to: to.clone(),
            trigger: label,
            timestamp: Utc::now(),
        });
        self.timers.arm(host, &self.transitions, &self.current)?;
        Ok(from)
    }

    /// Per-transition callback, then the machine-wide one.
    fn run_callbacks(&self, id: TransitionId, from: &S, to: &S) -> Result<(), MachineError> {
        if let Some(callback) = &self.transitions[id.0].on_transition {
            callback().map_err(callback_failed(from, to))?;
        }
        if let Some(global) = &self.on_transition {
            global(from, to).map_err(callback_failed(from, to))?;
        }
        Ok(())
    }

    /// Follow entity triggers of the current state that already hold.
    ///
    /// Callback failures do not stop the chain; the first one is returned once
    /// the machine has settled. Host failures stop it immediately.
    fn settle(&mut self, host: &mut H) -> Result<(), MachineError> {
        let mut failed = None;
        for _ in 0..S::all().len() {
            let next = self
                .transitions
                .iter()
                .filter(|t| *t.from() == self.current && !t.is_self_loop())
                .find(|t| {
                    t.trigger()
                        .entity()
                        .is_some_and(|entity| t.trigger().holds(host.get_state(entity).as_deref()))
                })
                .map(Transition::id);
            let Some(id) = next else {
                return failed.map_or(Ok(()), Err);
            };
            let from = self.execute(host, id)?;
            let to = self.current.clone();
            if let Err(error) = self.run_callbacks(id, &from, &to) {
                failed.get_or_insert(error);
            }
        }
        tracing::warn!(
            state = self.current.name(),
            "entry checks kept firing, stopped after one pass over every state"
        );
        failed.map_or(Ok(()), Err)
    }
}

fn callback_failed<S: State>(from: &S, to: &S) -> impl FnOnce(CallbackError) -> MachineError {
    let from = from.name().to_string();
    let to = to.name().to_string();
    move |source| MachineError::Callback { from, to, source }
}
