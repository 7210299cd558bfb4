//! Subscription to entity change notifications.

use crate::core::{Event, State};
use crate::machine::error::MachineError;
use crate::machine::host::Host;
use crate::machine::transition::Transition;
use std::collections::BTreeSet;

/// Tracks the entities a machine's triggers reference and subscribes to them.
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    entities: BTreeSet<String>,
}

impl EventRouter {
    /// Collect every entity referenced by an entity trigger anywhere in the table.
    pub fn from_transitions<S: State>(transitions: &[Transition<S>]) -> Self {
        let entities = transitions
            .iter()
            .filter_map(|t| t.trigger().entity())
            .map(str::to_string)
            .collect();
        Self { entities }
    }

    /// Ask the host to deliver changes for every entity of interest.
    pub fn subscribe<H: Host>(&self, host: &mut H) -> Result<(), MachineError> {
        for entity in &self.entities {
            host.listen_state(entity)
                .map_err(MachineError::host("subscribing to an entity"))?;
            tracing::debug!(entity = entity.as_str(), "subscribed");
        }
        Ok(())
    }

    /// Check whether `event` should reach the machine.
    ///
    /// Timer expiries always pass; entity changes only for subscribed entities.
    pub fn accepts(&self, event: &Event) -> bool {
        match event.entity() {
            Some(entity) => self.entities.contains(entity),
            None => true,
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> + '_ {
        self.entities.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TimerToken, TransitionId, Trigger};
    use crate::machine::host::HostError;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        A,
        B,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::A => "A",
                Self::B => "B",
            }
        }

        fn all() -> &'static [Self] {
            &[Self::A, Self::B]
        }
    }

    #[derive(Default)]
    struct ListenHost {
        listened: Vec<String>,
        refuse: bool,
    }

    impl Host for ListenHost {
        type TimerHandle = ();

        fn get_state(&self, _entity: &str) -> Option<String> {
            None
        }

        fn set_state(&mut self, _entity: &str, _value: &str) {}

        fn listen_state(&mut self, entity: &str) -> Result<(), HostError> {
            if self.refuse {
                return Err(HostError::Unavailable("listen_state".to_string()));
            }
            self.listened.push(entity.to_string());
            Ok(())
        }

        fn run_in(&mut self, _delay: Duration, _token: TimerToken) -> Result<(), HostError> {
            Ok(())
        }

        fn cancel_timer(&mut self, _handle: ()) {}
    }

    fn table() -> Vec<Transition<TestState>> {
        [
            Trigger::state_on("sensor.s"),
            Trigger::timeout_secs(3),
            Trigger::state_neq("sensor.t", "x"),
            Trigger::state_eq("sensor.s", "on"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, trigger)| Transition {
            id: TransitionId(i),
            from: TestState::A,
            trigger,
            to: TestState::B,
            on_transition: None,
        })
        .collect()
    }

    #[test]
    fn collects_unique_entities_and_skips_timeouts() {
        let router = EventRouter::from_transitions(&table());

        let entities: Vec<_> = router.entities().collect();
        assert_eq!(entities, vec!["sensor.s", "sensor.t"]);
    }

    #[test]
    fn subscribe_listens_once_per_entity() {
        let router = EventRouter::from_transitions(&table());
        let mut host = ListenHost::default();

        router.subscribe(&mut host).unwrap();

        assert_eq!(host.listened, vec!["sensor.s", "sensor.t"]);
    }

    #[test]
    fn subscribe_surfaces_host_failure() {
        let router = EventRouter::from_transitions(&table());
        let mut host = ListenHost {
            refuse: true,
            ..Default::default()
        };

        assert!(matches!(
            router.subscribe(&mut host),
            Err(MachineError::Host { .. })
        ));
    }

    #[test]
    fn accepts_only_subscribed_entities_and_timers() {
        let router = EventRouter::from_transitions(&table());

        assert!(router.accepts(&Event::entity_changed("sensor.t", "a", "b")));
        assert!(!router.accepts(&Event::entity_changed("sensor.u", "a", "b")));
        assert!(router.accepts(&Event::TimerExpired(TimerToken {
            transition: TransitionId(1),
            generation: 1,
        })));
    }
}
