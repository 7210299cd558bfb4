//! Autostate: an embeddable state machine for automations
//!
//! Autostate drives an automation from entity-state changes and elapsed-time
//! triggers. The host runtime (a home automation framework, a test harness, an
//! async task) owns the event loop and the entity store; the machine owns the
//! current state, the transition table and the timers it asked the host for.
//!
//! # Core Concepts
//!
//! - **State**: A closed set of states via the `State` trait or `state_enum!`
//! - **Trigger**: Entity equality/inequality, on/off shorthands and timeouts
//! - **Host**: The seam to the runtime's entity store, subscriptions and delays
//! - **Mirror entity**: Optional entity kept equal to the current state, and
//!   used to resume after a restart
//!
//! # Example
//!
//! ```rust
//! use autostate::builder::{Source, StateMachineBuilder};
//! use autostate::core::{Event, Trigger};
//! use autostate::machine::StateMachine;
//! # use autostate::core::TimerToken;
//! # use autostate::machine::{Host, HostError};
//! # use std::collections::HashMap;
//! # use std::time::Duration;
//! # #[derive(Default)]
//! # struct Hass { entities: HashMap<String, String>, timers: Vec<TimerToken> }
//! # impl Host for Hass {
//! #     type TimerHandle = usize;
//! #     fn get_state(&self, entity: &str) -> Option<String> { self.entities.get(entity).cloned() }
//! #     fn set_state(&mut self, entity: &str, value: &str) { self.entities.insert(entity.into(), value.into()); }
//! #     fn listen_state(&mut self, _entity: &str) -> Result<(), HostError> { Ok(()) }
//! #     fn run_in(&mut self, _delay: Duration, token: TimerToken) -> Result<usize, HostError> {
//! #         self.timers.push(token);
//! #         Ok(self.timers.len())
//! #     }
//! #     fn cancel_timer(&mut self, _handle: usize) {}
//! # }
//!
//! autostate::state_enum! {
//!     enum Presence {
//!         Home,
//!         Leaving,
//!         Away,
//!     }
//! }
//!
//! let mut host = Hass::default();
//! let mut machine: StateMachine<Presence, Hass> = StateMachineBuilder::new()
//!     .mirror_entity("input_select.presence")
//!     .add_transitions(Source::Any, Trigger::state_eq("device_tracker.phone", "home"), Presence::Home)
//!     .add_transition(Presence::Home, Trigger::state_neq("device_tracker.phone", "home"), Presence::Leaving)
//!     .add_transition(Presence::Leaving, Trigger::timeout_secs(30), Presence::Away)
//!     .build()
//!     .unwrap();
//!
//! machine.start(&mut host).unwrap();
//! machine
//!     .handle_event(&mut host, &Event::entity_changed("device_tracker.phone", "home", "not_home"))
//!     .unwrap();
//!
//! assert_eq!(machine.current_state(), &Presence::Leaving);
//! assert_eq!(host.get_state("input_select.presence").as_deref(), Some("Leaving"));
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, Source, StateMachineBuilder, TransitionBuilder};
pub use core::{Event, State, StateHistory, StateTransition, TimerToken, TransitionId, Trigger};
pub use machine::{Host, HostError, MachineError, StateMachine, StepResult};
