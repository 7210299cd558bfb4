//! Presence Detection
//!
//! This example drives a HOME / LEAVING / AWAY machine from a phone tracker.
//! Leaving the house only counts as "away" after 30 seconds, so a short trip
//! to the mailbox never flips the state.
//!
//! Key concepts:
//! - Wildcard registration (any state -> Home)
//! - Timeout triggers armed on state entry
//! - Mirror entity kept equal to the current state
//! - A simulated host with a virtual clock
//!
//! Run with: RUST_LOG=debug cargo run --example presence

use autostate::builder::{Source, StateMachineBuilder};
use autostate::core::{Event, TimerToken, Trigger};
use autostate::machine::{Host, HostError, MachineError, StateMachine};
use autostate::state_enum;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Presence {
        Home,
        Leaving,
        Away,
    }
}

const TRACKER: &str = "device_tracker.phone";
const MIRROR: &str = "input_select.presence";

#[derive(Default)]
struct SimulatedHome {
    entities: HashMap<String, String>,
    listened: HashSet<String>,
    timers: BTreeMap<u64, (Duration, TimerToken)>,
    queue: VecDeque<Event>,
    now: Duration,
    next_handle: u64,
}

impl SimulatedHome {
    fn update(&mut self, entity: &str, value: &str) {
        let old = self
            .entities
            .insert(entity.to_string(), value.to_string())
            .unwrap_or_default();
        if self.listened.contains(entity) {
            self.queue.push_back(Event::entity_changed(entity, old, value));
        }
    }

    fn sleep(&mut self, secs: u64) {
        self.now += Duration::from_secs(secs);
        let now = self.now;
        let due: Vec<u64> = self
            .timers
            .iter()
            .filter(|(_, (at, _))| *at <= now)
            .map(|(handle, _)| *handle)
            .collect();
        for handle in due {
            if let Some((_, token)) = self.timers.remove(&handle) {
                self.queue.push_back(Event::TimerExpired(token));
            }
        }
    }

    fn dispatch(&mut self, machine: &mut StateMachine<Presence, Self>) -> Result<(), MachineError> {
        while let Some(event) = self.queue.pop_front() {
            machine.handle_event(self, &event)?;
        }
        println!(
            "  t={:>3}s  state={:?}  {}={}",
            self.now.as_secs(),
            machine.current_state(),
            MIRROR,
            self.get_state(MIRROR).unwrap_or_default()
        );
        Ok(())
    }
}

impl Host for SimulatedHome {
    type TimerHandle = u64;

    fn get_state(&self, entity: &str) -> Option<String> {
        self.entities.get(entity).cloned()
    }

    fn set_state(&mut self, entity: &str, value: &str) {
        self.update(entity, value);
    }

    fn listen_state(&mut self, entity: &str) -> Result<(), HostError> {
        self.listened.insert(entity.to_string());
        Ok(())
    }

    fn run_in(&mut self, delay: Duration, token: TimerToken) -> Result<u64, HostError> {
        self.next_handle += 1;
        self.timers
            .insert(self.next_handle, (self.now + delay, token));
        Ok(self.next_handle)
    }

    fn cancel_timer(&mut self, handle: u64) {
        self.timers.remove(&handle);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Presence Detection ===\n");

    let mut machine: StateMachine<Presence, SimulatedHome> = StateMachineBuilder::new()
        .mirror_entity(MIRROR)
        .add_transitions(Source::Any, Trigger::state_eq(TRACKER, "home"), Presence::Home)
        .add_transition(
            Presence::Home,
            Trigger::state_neq(TRACKER, "home"),
            Presence::Leaving,
        )
        .add_transition(Presence::Leaving, Trigger::timeout_secs(30), Presence::Away)
        .on_transition(|from: &Presence, to: &Presence| {
            println!("  -> {from:?} to {to:?}");
            Ok(())
        })
        .build()?;

    println!("Transition graph:\n  {}\n", machine.to_dot());
    machine.log_graph();

    let mut home = SimulatedHome::default();
    home.update(TRACKER, "home");
    machine.start(&mut home)?;

    println!("Quick trip to the mailbox:");
    home.update(TRACKER, "not_home");
    home.dispatch(&mut machine)?;
    home.sleep(10);
    home.update(TRACKER, "home");
    home.dispatch(&mut machine)?;

    println!("\nLeaving for work:");
    home.update(TRACKER, "not_home");
    home.dispatch(&mut machine)?;
    home.sleep(30);
    home.dispatch(&mut machine)?;

    println!("\nHistory:");
    for transition in machine.history().transitions() {
        println!(
            "  {:?} -> {:?} on {}",
            transition.from, transition.to, transition.trigger
        );
    }

    Ok(())
}
