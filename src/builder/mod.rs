//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and a macro for declaring states and
//! registering transitions. Wildcard and list registrations are expanded here,
//! so the machine itself only ever sees a flat table of concrete transitions.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;
mod validation;

pub use error::{BuildError, ConfigViolation};
pub use machine::StateMachineBuilder;
pub use transition::{Source, TransitionBuilder, Triggers};
