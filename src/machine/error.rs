//! Runtime errors surfaced by a running machine.

use crate::machine::host::HostError;
use thiserror::Error;

/// Error returned by user callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while starting or driving a machine.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Machine not started. Call .start(host) before delivering events")]
    NotStarted,

    #[error("Machine already started")]
    AlreadyStarted,

    #[error("Host failed while {operation}: {source}")]
    Host {
        operation: &'static str,
        #[source]
        source: HostError,
    },

    /// The transition itself is committed; only the callback failed.
    #[error("Transition callback failed on '{from}' -> '{to}': {source}")]
    Callback {
        from: String,
        to: String,
        #[source]
        source: CallbackError,
    },
}

impl MachineError {
    pub(crate) fn host(operation: &'static str) -> impl FnOnce(HostError) -> Self {
        move |source| Self::Host { operation, source }
    }
}
