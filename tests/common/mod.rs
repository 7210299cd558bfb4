//! Manual-clock host shared by the integration tests.

#![allow(dead_code)]

use autostate::core::{Event, State, TimerToken};
use autostate::machine::{Host, HostError, MachineError, StateMachine, StepResult};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Duration;

autostate::state_enum! {
    pub enum States {
        A,
        B,
        C,
    }
}

autostate::state_enum! {
    pub enum Presence {
        Home,
        Away,
        Leaving,
    }
}

pub struct Timer {
    pub due: Duration,
    pub token: TimerToken,
}

/// Host with an in-memory entity store, a virtual clock and a queue of
/// events waiting to be delivered.
#[derive(Default)]
pub struct FakeHost {
    pub entities: HashMap<String, String>,
    pub listened: HashSet<String>,
    pub timers: BTreeMap<u64, Timer>,
    pub cancelled: Vec<u64>,
    pub queue: VecDeque<Event>,
    pub now: Duration,
    pub writes: Vec<(String, String)>,
    pub scheduler_down: bool,
    next_handle: u64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change an entity from the outside, queueing a notification if listened to.
    pub fn set(&mut self, entity: &str, value: &str) {
        let old = self
            .entities
            .insert(entity.to_string(), value.to_string())
            .unwrap_or_default();
        if self.listened.contains(entity) {
            self.queue
                .push_back(Event::entity_changed(entity, old, value));
        }
    }

    /// Move the clock forward, queueing expiries for every due timer.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        let mut due: Vec<(Duration, u64)> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= self.now)
            .map(|(handle, timer)| (timer.due, *handle))
            .collect();
        due.sort();
        for (_, handle) in due {
            if let Some(timer) = self.timers.remove(&handle) {
                self.queue.push_back(Event::TimerExpired(timer.token));
            }
        }
    }

    pub fn advance_secs(&mut self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    pub fn get(&self, entity: &str) -> Option<&str> {
        self.entities.get(entity).map(String::as_str)
    }

    pub fn pending_tokens(&self) -> Vec<TimerToken> {
        self.timers.values().map(|timer| timer.token).collect()
    }

    /// Deliver every queued event, in order.
    pub fn pump<S: State>(
        &mut self,
        machine: &mut StateMachine<S, FakeHost>,
    ) -> Result<Vec<StepResult<S>>, MachineError> {
        let mut results = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            results.push(machine.handle_event(self, &event)?);
        }
        Ok(results)
    }

    /// Change an entity and deliver the resulting events.
    pub fn set_and_pump<S: State>(
        &mut self,
        machine: &mut StateMachine<S, FakeHost>,
        entity: &str,
        value: &str,
    ) {
        self.set(entity, value);
        self.pump(machine).unwrap();
    }

    /// Move the clock and deliver the resulting events.
    pub fn advance_and_pump<S: State>(&mut self, machine: &mut StateMachine<S, FakeHost>, secs: u64) {
        self.advance_secs(secs);
        self.pump(machine).unwrap();
    }
}

impl Host for FakeHost {
    type TimerHandle = u64;

    fn get_state(&self, entity: &str) -> Option<String> {
        self.entities.get(entity).cloned()
    }

    fn set_state(&mut self, entity: &str, value: &str) {
        self.writes.push((entity.to_string(), value.to_string()));
        self.set(entity, value);
    }

    fn listen_state(&mut self, entity: &str) -> Result<(), HostError> {
        self.listened.insert(entity.to_string());
        Ok(())
    }

    fn run_in(&mut self, delay: Duration, token: TimerToken) -> Result<u64, HostError> {
        if self.scheduler_down {
            return Err(HostError::Unavailable("run_in".to_string()));
        }
        self.next_handle += 1;
        self.timers.insert(
            self.next_handle,
            Timer {
                due: self.now + delay,
                token,
            },
        );
        Ok(self.next_handle)
    }

    fn cancel_timer(&mut self, handle: u64) {
        if self.timers.remove(&handle).is_some() {
            self.cancelled.push(handle);
        }
    }
}
