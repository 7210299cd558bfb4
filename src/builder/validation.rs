//! Configuration checks run by [`StateMachineBuilder::build`](super::StateMachineBuilder::build).
//!
//! Checks use Stillwater's `Validation` so a misconfigured machine reports
//! every problem at once instead of the first one.

use crate::builder::error::ConfigViolation;
use crate::core::State;
use crate::machine::Transition;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Validate the declared state set, the transition table, the initial state
/// and the mirror entity, accumulating ALL violations.
pub(crate) fn validate<S: State>(
    initial: &S,
    transitions: &[Transition<S>],
    mirror_entity: Option<&str>,
) -> Result<(), Vec<ConfigViolation>> {
    let mut checks: Vec<Check> = Vec::new();

    let mut seen = HashSet::new();
    for state in S::all() {
        checks.push(check(!state.name().is_empty(), || {
            ConfigViolation::EmptyStateName
        }));
        checks.push(check(seen.insert(state.name()), || {
            ConfigViolation::DuplicateStateName {
                name: state.name().to_string(),
            }
        }));
    }

    let mut used = vec![initial];
    for transition in transitions {
        used.push(transition.from());
        used.push(transition.to());

        let trigger = transition.trigger();
        if let Some(delay) = trigger.delay() {
            checks.push(check(!delay.is_zero(), || ConfigViolation::ZeroTimeout {
                transition: transition.id(),
            }));
        }
        if let Some(entity) = trigger.entity() {
            checks.push(check(!entity.is_empty(), || ConfigViolation::EmptyEntity {
                transition: transition.id(),
            }));
        }
    }

    let mut reported = HashSet::new();
    for state in used {
        if !S::all().contains(state) && reported.insert(state.name()) {
            checks.push(Validation::fail(ConfigViolation::UndeclaredState {
                name: state.name().to_string(),
            }));
        }
    }

    if let Some(entity) = mirror_entity {
        checks.push(check(!entity.is_empty(), || {
            ConfigViolation::EmptyMirrorEntity
        }));
    }

    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}
