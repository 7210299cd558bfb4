//! The side-effecting shell around the pure core.
//!
//! Everything that talks to the host lives here: subscribing to entities,
//! scheduling and cancelling timeouts, writing the mirrored entity and running
//! callbacks.
//!
//! # Data flow
//!
//! host event → [`EventRouter`] → [`StateMachine::evaluate`] → transition
//! commit → [`TimerManager`] re-arm, mirror write, callbacks.

mod engine;
mod error;
mod graph;
mod host;
mod router;
mod timer;
mod transition;

pub(crate) use engine::MachineParts;
pub use engine::{StateMachine, StepResult};
pub use error::{CallbackError, MachineError};
pub use graph::{renderer_link, to_dot, RENDERER_URL};
pub use host::{Host, HostError};
pub use router::EventRouter;
pub use timer::TimerManager;
pub use transition::{GlobalCallback, Transition, TransitionCallback};
