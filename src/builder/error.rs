//! Build errors for state machine and transition builders.

use crate::core::TransitionId;
use thiserror::Error;

/// A single problem found while validating a machine's configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("State '{name}' is used but not listed by State::all()")]
    UndeclaredState { name: String },

    #[error("State name '{name}' is declared more than once")]
    DuplicateStateName { name: String },

    #[error("A declared state has an empty name")]
    EmptyStateName,

    #[error("Transition {transition} has a zero-length timeout")]
    ZeroTimeout { transition: TransitionId },

    #[error("Transition {transition} watches an entity with an empty name")]
    EmptyEntity { transition: TransitionId },

    #[error("Mirror entity name is empty")]
    EmptyMirrorEntity,
}

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No states declared. State::all() must list at least one state")]
    NoStates,

    #[error("Transition source state not specified. Call .from(state) or .any()")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition trigger not specified. Call .trigger(trigger)")]
    MissingTrigger,

    #[error("Invalid configuration: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),
}

impl BuildError {
    /// Violations carried by [`BuildError::Invalid`], empty otherwise.
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            Self::Invalid(violations) => violations,
            _ => &[],
        }
    }
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
