//! Core state machine types and logic.
//!
//! This module contains the pure part of the engine:
//! - State definitions via the `State` trait
//! - Trigger conditions and the events they are evaluated against
//! - Bounded history of committed transitions
//!
//! Nothing here talks to the host; side effects live in [`crate::machine`].

mod event;
mod history;
mod state;
mod trigger;

pub use event::{Event, TimerToken, TransitionId};
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
pub use trigger::{Trigger, ON};
