//! Running a machine against a host backed by the tokio timer wheel.

use autostate::builder::StateMachineBuilder;
use autostate::core::{Event, TimerToken, Trigger};
use autostate::machine::{Host, HostError, StateMachine, StepResult};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

autostate::state_enum! {
    enum Door {
        Closed,
        Open,
        Alarm,
    }
}

struct TokioHost {
    entities: HashMap<String, String>,
    listened: HashSet<String>,
    events: mpsc::UnboundedSender<Event>,
}

impl TokioHost {
    fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let host = Self {
            entities: HashMap::new(),
            listened: HashSet::new(),
            events,
        };
        (host, rx)
    }

    fn update(&mut self, entity: &str, value: &str) {
        let old = self
            .entities
            .insert(entity.to_string(), value.to_string())
            .unwrap_or_default();
        if self.listened.contains(entity) {
            let _ = self.events.send(Event::entity_changed(entity, old, value));
        }
    }
}

impl Host for TokioHost {
    type TimerHandle = JoinHandle<()>;

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

    fn run_in(&mut self, delay: Duration, token: TimerToken) -> Result<JoinHandle<()>, HostError> {
        let events = self.events.clone();
        Ok(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::TimerExpired(token));
        }))
    }

    fn cancel_timer(&mut self, handle: JoinHandle<()>) {
        handle.abort();
    }
}

fn door_machine() -> StateMachine<Door, TokioHost> {
    StateMachineBuilder::new()
        .add_transition(Door::Closed, Trigger::state_on("binary_sensor.door"), Door::Open)
        .add_transition(Door::Open, Trigger::state_off("binary_sensor.door"), Door::Closed)
        .add_transition(Door::Open, Trigger::timeout(Duration::from_millis(50)), Door::Alarm)
        .add_transition(Door::Alarm, Trigger::state_off("binary_sensor.door"), Door::Closed)
        .build()
        .unwrap()
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>, wait: Duration) -> Option<Event> {
    tokio::time::timeout(wait, rx.recv()).await.ok().flatten()
}

#[tokio::test]
async fn door_left_open_raises_alarm() {
    let (mut host, mut rx) = TokioHost::new();
    host.update("binary_sensor.door", "off");
    let mut machine = door_machine();
    machine.start(&mut host).unwrap();

    host.update("binary_sensor.door", "on");
    let opened = next_event(&mut rx, Duration::from_secs(1)).await.unwrap();
    machine.handle_event(&mut host, &opened).unwrap();
    assert_eq!(machine.current_state(), &Door::Open);

    let expired = next_event(&mut rx, Duration::from_secs(1)).await.unwrap();
    assert_eq!(expired.event_type(), "timer_expired");
    let result = machine.handle_event(&mut host, &expired).unwrap();

    assert!(result.is_transition());
    assert_eq!(machine.current_state(), &Door::Alarm);
    assert_eq!(machine.pending_timers(), 0);
}

#[tokio::test]
async fn closing_in_time_cancels_the_alarm() {
    let (mut host, mut rx) = TokioHost::new();
    host.update("binary_sensor.door", "off");
    let mut machine = door_machine();
    machine.start(&mut host).unwrap();

    host.update("binary_sensor.door", "on");
    host.update("binary_sensor.door", "off");
    while let Some(event) = next_event(&mut rx, Duration::from_millis(150)).await {
        machine.handle_event(&mut host, &event).unwrap();
    }

    assert_eq!(machine.current_state(), &Door::Closed);
    assert_eq!(machine.pending_timers(), 0);
    assert_eq!(machine.history().len(), 2);
}

#[tokio::test]
async fn expiry_racing_a_transition_is_ignored() {
    let (mut host, mut rx) = TokioHost::new();
    host.update("binary_sensor.door", "off");
    let mut machine = door_machine();
    machine.start(&mut host).unwrap();

    host.update("binary_sensor.door", "on");
    let opened = next_event(&mut rx, Duration::from_secs(1)).await.unwrap();
    machine.handle_event(&mut host, &opened).unwrap();

    // The timer fires, but the door closes before its expiry is dispatched.
    tokio::time::sleep(Duration::from_millis(100)).await;
    host.entities
        .insert("binary_sensor.door".to_string(), "off".to_string());
    let closed = Event::entity_changed("binary_sensor.door", "on", "off");
    machine.handle_event(&mut host, &closed).unwrap();
    assert_eq!(machine.current_state(), &Door::Closed);

    let mut results = Vec::new();
    while let Some(event) = next_event(&mut rx, Duration::from_millis(100)).await {
        results.push(machine.handle_event(&mut host, &event).unwrap());
    }

    assert_eq!(results, vec![StepResult::Ignored]);
    assert_eq!(machine.current_state(), &Door::Closed);
}
