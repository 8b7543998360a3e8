//! Builder for constructing state machines.

use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, StateId, StateRef};
use crate::error::MachineError;
use crate::machine::{MachineConfig, MachineTemplate, StateMachine};
use std::collections::HashMap;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike adding to a live machine, transitions may name states declared
/// later: `build` adds every state before any transition.
///
/// # Example
///
/// ```rust
/// use eventfsm::builder::{StateMachineBuilder, TransitionBuilder};
/// use eventfsm::core::Event;
///
/// struct Coin;
/// impl Event for Coin {
///     type Kind = &'static str;
///     fn kind(&self) -> Self::Kind {
///         "Coin"
///     }
/// }
///
/// let machine = StateMachineBuilder::<Coin>::new()
///     .transition("locked", TransitionBuilder::on("Coin").to("open"))
///     .state("locked")
///     .state("open")
///     .build()
///     .unwrap();
///
/// machine.process_event(&Coin).unwrap();
/// assert!(machine.is_in("open"));
/// ```
pub struct StateMachineBuilder<E: Event> {
    config: MachineConfig,
    states: Vec<StateBuilder<E>>,
    transitions: Vec<(StateRef, TransitionBuilder<E>)>,
    start: Option<StateRef>,
}

impl<E: Event> StateMachineBuilder<E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            states: Vec::new(),
            transitions: Vec::new(),
            start: None,
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare a state. The first one declared is the start state unless
    /// `start` says otherwise.
    pub fn state(mut self, state: impl Into<StateBuilder<E>>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Declare a transition leaving `source`.
    pub fn transition(
        mut self,
        source: impl Into<StateRef>,
        builder: TransitionBuilder<E>,
    ) -> Self {
        self.transitions.push((source.into(), builder));
        self
    }

    /// Choose the start state (optional).
    pub fn start(mut self, state: impl Into<StateRef>) -> Self {
        self.start = Some(state.into());
        self
    }

    /// Build the state machine.
    ///
    /// Returns the first error found: a duplicate state, a transition from
    /// an undeclared state, an undeclared destination, or an undeclared
    /// start state.
    pub fn build(self) -> Result<StateMachine<E>, MachineError> {
        let machine = StateMachine::with_config(self.config);
        self.populate(&machine, &HashMap::new())?;
        Ok(machine)
    }

    pub(crate) fn configured(&self) -> MachineConfig {
        self.config
    }

    /// Add the declared states and transitions to `machine`, which keeps
    /// its own configuration. States named in `ids` take that identity.
    pub(crate) fn populate(
        self,
        machine: &StateMachine<E>,
        ids: &HashMap<String, StateId>,
    ) -> Result<(), MachineError> {
        for state in self.states {
            let id = ids.get(&state.name).copied();
            machine.add_state_with_id(state, id)?;
        }
        for (source, transition) in self.transitions {
            machine.add_transition(source, transition)?;
        }
        if let Some(start) = self.start {
            machine.set_start_state(start)?;
            let mut core = machine.core.borrow_mut();
            let start = core.start;
            core.current = start;
        }
        Ok(())
    }

    /// Build a template instead of a single machine.
    pub fn build_template(self) -> Result<MachineTemplate<E>, MachineError> {
        self.build().map(|machine| MachineTemplate::from_machine(&machine))
    }
}

impl<E: Event> Default for StateMachineBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
