//! Timer bookkeeping for timeout-triggered transitions.

use crate::core::{State, TimerToken};
use crate::machine::error::MachineError;
use crate::machine::host::Host;
use crate::machine::transition::Transition;

struct PendingTimer<T> {
    token: TimerToken,
    handle: T,
}

/// Owns every delay currently scheduled with the host.
///
/// At most one timer is pending per timeout transition of the current state.
/// Each call to [`arm`](Self::arm) starts a new generation, so tokens from an
/// earlier stay in a state are never live again even if the host delivers them
/// late.
pub struct TimerManager<T> {
    generation: u64,
    pending: Vec<PendingTimer<T>>,
}

impl<T> Default for TimerManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerManager<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule one delay for every timeout transition leaving `state`.
    ///
    /// Returns the number of timers armed.
    pub fn arm<S, H>(
        &mut self,
        host: &mut H,
        transitions: &[Transition<S>],
        state: &S,
    ) -> Result<usize, MachineError>
    where
        S: State,
        H: Host<TimerHandle = T>,
    {
        self.generation += 1;
        let mut armed = 0;
        for transition in transitions.iter().filter(|t| t.from() == state) {
            let Some(delay) = transition.trigger().delay() else {
                continue;
            };
            let token = TimerToken {
                transition: transition.id(),
                generation: self.generation,
            };
            let handle = host
                .run_in(delay, token)
                .map_err(MachineError::host("scheduling a timeout"))?;
            tracing::debug!(
                state = state.name(),
                transition = %token.transition,
                generation = token.generation,
                delay_secs = delay.as_secs_f64(),
                "armed timeout"
            );
            self.pending.push(PendingTimer { token, handle });
            armed += 1;
        }
        Ok(armed)
    }

    /// Revoke every pending delay. Safe to call with nothing pending.
    pub fn cancel_all<H>(&mut self, host: &mut H)
    where
        H: Host<TimerHandle = T>,
    {
        for timer in self.pending.drain(..) {
            host.cancel_timer(timer.handle);
        }
    }

    /// Check whether `token` belongs to a timer that is still pending.
    pub fn is_live(&self, token: &TimerToken) -> bool {
        self.pending.iter().any(|t| t.token == *token)
    }

    /// Forget a timer that has fired, so it is not cancelled later.
    pub fn retire(&mut self, token: &TimerToken) -> bool {
        match self.pending.iter().position(|t| t.token == *token) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
