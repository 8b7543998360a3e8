//! Serializable machine definitions.

use crate::builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
use crate::core::{Event, MatchArg};
use crate::definition::registry::Registry;
use crate::error::MachineError;
use crate::machine::{MachineConfig, MachineTemplate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// A whole machine described as data.
///
/// `K` is the event kind type. Callbacks are referenced by name and
/// resolved against a [`Registry`] when the definition is validated or
/// compiled.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::Event;
/// use eventfsm::definition::{MachineDefinition, Registry};
///
/// struct Tap;
/// impl Event for Tap {
///     type Kind = String;
///     fn kind(&self) -> Self::Kind {
///         "Tap".to_string()
///     }
/// }
///
/// let definition: MachineDefinition<String> = serde_json::from_str(
///     r#"{
///         "states": [
///             { "name": "off", "transitions": [{ "on": "Tap", "to": "on" }] },
///             { "name": "on", "transitions": [{ "on": "Tap", "to": "off" }] }
///         ]
///     }"#,
/// )
/// .unwrap();
///
/// let machine = definition
///     .compile(&Registry::<Tap>::new())
///     .unwrap()
///     .instantiate()
///     .unwrap();
/// machine.process_event(&Tap).unwrap();
/// assert!(machine.is_in("on"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct MachineDefinition<K> {
    #[serde(default)]
    pub config: MachineConfig,
    pub states: Vec<StateDefinition<K>>,
}

/// A state and the transitions leaving it, in priority order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct StateDefinition<K> {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave: Option<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition<K>>,
}

/// A transition; without `to` it is a self-loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition<K> {
    pub on: K,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<MatchArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

fn check(
    valid: bool,
    error: impl FnOnce() -> MachineError,
) -> Validation<(), NonEmptyVec<MachineError>> {
    if valid {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

impl<K: Clone> MachineDefinition<K> {
    /// Check the definition against `registry`, reporting every problem at
    /// once rather than stopping at the first.
    pub fn validate<E: Event>(
        &self,
        registry: &Registry<E>,
    ) -> Validation<(), NonEmptyVec<MachineError>> {
        let names: HashSet<&str> = self.states.iter().map(|s| s.name.as_str()).collect();
        let mut seen = HashSet::new();
        let mut checks = Vec::new();

        for state in &self.states {
            checks.push(check(seen.insert(state.name.as_str()), || {
                MachineError::StateAlreadyExists(state.name.clone())
            }));
            for hook in state.enter.iter().chain(state.leave.iter()) {
                checks.push(check(registry.contains_hook(hook), || {
                    MachineError::InvalidAction(hook.clone())
                }));
            }
            for transition in &state.transitions {
                if let Some(to) = &transition.to {
                    checks.push(check(names.contains(to.as_str()), || {
                        MachineError::InvalidDestination(to.clone())
                    }));
                }
                if let Some(guard) = &transition.guard {
                    checks.push(check(registry.contains_guard(guard), || {
                        MachineError::InvalidGuard(guard.clone())
                    }));
                }
                if let Some(action) = &transition.action {
                    checks.push(check(registry.contains_action(action), || {
                        MachineError::InvalidAction(action.clone())
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build a template from the definition, stopping at the first error.
    ///
    /// Every instance shares the registry's callbacks. State that must be
    /// kept per instance belongs in a template built with
    /// [`MachineTemplate::from_fn`].
    pub fn compile<E>(&self, registry: &Registry<E>) -> Result<MachineTemplate<E>, MachineError>
    where
        E: Event<Kind = K>,
    {
        let mut builder = StateMachineBuilder::new().config(self.config);

        for state in &self.states {
            let mut declared = StateBuilder::new(state.name.clone());
            if let Some(enter) = &state.enter {
                declared = declared.enter_hook(registry.lookup_hook(enter)?);
            }
            if let Some(leave) = &state.leave {
                declared = declared.leave_hook(registry.lookup_hook(leave)?);
            }
            builder = builder.state(declared);

            for transition in &state.transitions {
                let declared = transition.to_builder(registry)?;
                builder = builder.transition(state.name.as_str(), declared);
            }
        }

        let template = builder.build_template()?;
        debug!(states = self.states.len(), "compiled machine definition");
        Ok(template)
    }
}

impl<K: Clone> TransitionDefinition<K> {
    fn to_builder<E>(&self, registry: &Registry<E>) -> Result<TransitionBuilder<E>, MachineError>
    where
        E: Event<Kind = K>,
    {
        let mut builder =
            TransitionBuilder::on(self.on.clone()).args(self.args.iter().cloned());
        if let Some(guard) = &self.guard {
            builder = builder.guard(registry.lookup_guard(guard)?);
        }
        if let Some(action) = &self.action {
            builder = builder.action_handle(registry.lookup_action(action)?);
        }
        if let Some(to) = &self.to {
            builder = builder.to(to.as_str());
        }
        Ok(builder)
    }
}
