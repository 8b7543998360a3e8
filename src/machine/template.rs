//! Reusable machine templates.

use crate::builder::StateMachineBuilder;
use crate::core::{Event, State, StateId};
use crate::error::{InstantiateError, MachineError};
use crate::machine::config::MachineConfig;
use crate::machine::machine::{StateMachine, WeakMachine};
use std::collections::HashMap;
use std::rc::Rc;

/// Declarations run once per instance, given a handle to that instance.
pub(crate) type Declare<E> =
    Rc<dyn Fn(WeakMachine<E>) -> Result<StateMachineBuilder<E>, MachineError>>;

/// The structure of a machine, instantiated into any number of independent
/// machines.
///
/// Each instance owns its own state objects, but they carry the template's
/// canonical identities: a state of one instance compares equal to the
/// same state of any other instance, and `find_state` on one instance
/// resolves a state taken from another.
///
/// A template captured with [`from_machine`](Self::from_machine) shares its
/// callbacks between all instances. A template made with
/// [`from_fn`](Self::from_fn) re-runs its declarations for every instance,
/// so callbacks can capture per-instance data and a [`WeakMachine`] to
/// their own instance.
///
/// # Example
///
/// ```rust
/// use eventfsm::builder::TransitionBuilder;
/// use eventfsm::core::Event;
/// use eventfsm::machine::{MachineTemplate, StateMachine};
///
/// struct Toggle;
/// impl Event for Toggle {
///     type Kind = &'static str;
///     fn kind(&self) -> Self::Kind {
///         "Toggle"
///     }
/// }
///
/// let blueprint: StateMachine<Toggle> = StateMachine::new();
/// blueprint.add_state("off").unwrap();
/// blueprint.add_state("on").unwrap();
/// blueprint.add_transition("off", TransitionBuilder::on("Toggle").to("on")).unwrap();
/// blueprint.add_transition("on", TransitionBuilder::on("Toggle").to("off")).unwrap();
///
/// let template = MachineTemplate::from_machine(&blueprint);
/// let first = template.instantiate().unwrap();
/// let second = template.instantiate().unwrap();
///
/// first.process_event(&Toggle).unwrap();
/// assert!(first.is_in("on"));
/// assert!(second.is_in("off"));
/// assert_eq!(first.find_state("off"), second.find_state("off"));
/// ```
pub struct MachineTemplate<E: Event> {
    states: Vec<Rc<State<E>>>,
    start: Option<usize>,
    config: MachineConfig,
    declare: Option<Declare<E>>,
}

impl<E: Event> MachineTemplate<E> {
    /// Capture the structure and configuration of an existing machine.
    ///
    /// Later changes to the machine do not affect the template.
    pub fn from_machine(machine: &StateMachine<E>) -> Self {
        let core = machine.core.borrow();
        Self {
            states: core.states.clone(),
            start: core.start,
            config: core.config,
            declare: None,
        }
    }

    /// Declare the machine once per instance.
    ///
    /// `declare` receives a handle to the instance being built. It runs
    /// once here to fix the template's structure and identities, then again
    /// for every instance; states are matched to the template by name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use eventfsm::builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
    /// use eventfsm::core::Event;
    /// use eventfsm::machine::{MachineTemplate, WeakMachine};
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// struct Toggle;
    /// impl Event for Toggle {
    ///     type Kind = &'static str;
    ///     fn kind(&self) -> Self::Kind {
    ///         "Toggle"
    ///     }
    /// }
    ///
    /// let template = MachineTemplate::from_fn(|this: WeakMachine<Toggle>| {
    ///     let flips = Rc::new(Cell::new(0));
    ///     StateMachineBuilder::new()
    ///         .state(StateBuilder::new("off").on_enter(move || {
    ///             if this.is_active() {
    ///                 flips.set(flips.get() + 1);
    ///             }
    ///         }))
    ///         .state("on")
    ///         .transition("off", TransitionBuilder::on("Toggle").to("on"))
    ///         .transition("on", TransitionBuilder::on("Toggle").to("off"))
    /// })
    /// .unwrap();
    ///
    /// let first = template.instantiate().unwrap();
    /// let second = template.instantiate().unwrap();
    /// assert_eq!(first.find_state("on"), second.find_state("on"));
    /// ```
    pub fn from_fn<F>(declare: F) -> Result<Self, MachineError>
    where
        F: Fn(WeakMachine<E>) -> StateMachineBuilder<E> + 'static,
    {
        Self::from_declaration(Rc::new(move |this| Ok(declare(this))))
    }

    pub(crate) fn from_declaration(declare: Declare<E>) -> Result<Self, MachineError> {
        let prototype = StateMachine::new();
        let builder = declare(prototype.downgrade())?;
        let config = builder.configured();
        builder.populate(&prototype, &HashMap::new())?;

        let core = prototype.core.borrow();
        Ok(Self {
            states: core.states.clone(),
            start: core.start,
            config,
            declare: Some(Rc::clone(&declare)),
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The template's states, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &Rc<State<E>>> {
        self.states.iter()
    }

    /// Create a machine with the template's configuration.
    pub fn instantiate(&self) -> Result<StateMachine<E>, InstantiateError> {
        self.instantiate_with(self.config)
    }

    /// Create a machine with another configuration.
    ///
    /// An active instance with `call_actions_on_reset` runs its start
    /// state's enter action once, while marked inactive.
    pub fn instantiate_with(
        &self,
        config: MachineConfig,
    ) -> Result<StateMachine<E>, InstantiateError> {
        let machine = match &self.declare {
            Some(declare) => {
                let machine = StateMachine::with_config(config);
                let ids: HashMap<String, StateId> = self
                    .states
                    .iter()
                    .map(|state| (state.name().to_string(), state.id()))
                    .collect();
                declare(machine.downgrade())?.populate(&machine, &ids)?;
                machine
            }
            None => {
                let states = self
                    .states
                    .iter()
                    .map(|state| Rc::new(State::clone(state)))
                    .collect();
                StateMachine::from_parts(states, self.start, config)
            }
        };

        if config.active && config.call_actions_on_reset {
            machine.enter_initial()?;
        }
        Ok(machine)
    }
}

impl<E: Event> From<&StateMachine<E>> for MachineTemplate<E> {
    fn from(machine: &StateMachine<E>) -> Self {
        Self::from_machine(machine)
    }
}

impl<E: Event> Clone for MachineTemplate<E> {
    fn clone(&self) -> Self {
        Self {
            states: self.states.clone(),
            start: self.start,
            config: self.config,
            declare: self.declare.clone(),
        }
    }
}
