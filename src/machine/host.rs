//! The seam between a machine and the runtime that hosts it.

use crate::core::TimerToken;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a host primitive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("host primitive unavailable: {0}")]
    Unavailable(String),
}

/// Runtime services a machine needs: an entity store, change notifications
/// and one-shot delayed callbacks.
///
/// The host owns the event loop. Anything it observes for a subscribed entity,
/// and every timer it fires, goes back to the machine through
/// [`StateMachine::handle_event`](super::StateMachine::handle_event), one event
/// at a time.
pub trait Host {
    /// Opaque handle for a scheduled delay.
    type TimerHandle;

    /// Current value of an entity, `None` when the store does not know it.
    fn get_state(&self, entity: &str) -> Option<String>;

    /// Write an entity value.
    fn set_state(&mut self, entity: &str, value: &str);

    /// Start delivering [`Event::EntityChanged`](crate::core::Event::EntityChanged)
    /// for `entity`.
    fn listen_state(&mut self, entity: &str) -> Result<(), HostError>;

    /// Deliver [`Event::TimerExpired`](crate::core::Event::TimerExpired) carrying
    /// `token` once `delay` has elapsed.
    fn run_in(&mut self, delay: Duration, token: TimerToken)
        -> Result<Self::TimerHandle, HostError>;

    /// Revoke a scheduled delay. Must be a no-op for handles that already fired.
    fn cancel_timer(&mut self, handle: Self::TimerHandle);
}
