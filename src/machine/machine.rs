//! The state machine: builder surface, dispatch and lifecycle.

use crate::builder::{StateBuilder, TransitionBuilder};
use crate::core::{
    Destination, Event, State, StateHistory, StateId, StateRef, StateTransition, Transition,
};
use crate::error::{ActionError, MachineError};
use crate::machine::config::MachineConfig;
use chrono::Utc;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Outcome of [`StateMachine::process_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A transition matched and fired
    Fired,

    /// No transition of the current state matched; nothing ran
    Ignored,

    /// The machine is suspended; the event was dropped without matching
    Inactive,
}

impl Dispatch {
    pub fn fired(&self) -> bool {
        matches!(self, Dispatch::Fired)
    }

    /// `Some(true)` when fired, `Some(false)` when ignored, `None` when the
    /// machine was inactive.
    pub fn as_option(&self) -> Option<bool> {
        match self {
            Dispatch::Fired => Some(true),
            Dispatch::Ignored => Some(false),
            Dispatch::Inactive => None,
        }
    }
}

pub(crate) struct Core<E: Event> {
    pub(crate) states: Vec<Rc<State<E>>>,
    pub(crate) start: Option<usize>,
    pub(crate) current: Option<usize>,
    pub(crate) active: bool,
    pub(crate) config: MachineConfig,
    pub(crate) history: StateHistory,
}

impl<E: Event> Core<E> {
    pub(crate) fn position(&self, reference: &StateRef) -> Option<usize> {
        self.states.iter().position(|s| s.is(reference))
    }

    fn current_state(&self) -> Option<Rc<State<E>>> {
        self.current.map(|i| Rc::clone(&self.states[i]))
    }
}

/// An event-driven state machine.
///
/// `StateMachine` is a cheap handle: cloning it yields another handle to the
/// same machine. It is single-threaded by construction. Callbacks that need
/// to look at the machine while they run (e.g. to tell a `reset` from an
/// ordinary transition through [`is_active`](Self::is_active)) should capture
/// a [`WeakMachine`] from [`downgrade`](Self::downgrade); no internal borrow
/// is held while callbacks execute, so they may even call
/// [`process_event`](Self::process_event) recursively.
///
/// # Example
///
/// ```rust
/// use eventfsm::builder::TransitionBuilder;
/// use eventfsm::core::Event;
/// use eventfsm::machine::{Dispatch, StateMachine};
///
/// struct Coin;
/// impl Event for Coin {
///     type Kind = &'static str;
///     fn kind(&self) -> Self::Kind {
///         "Coin"
///     }
/// }
///
/// let turnstile: StateMachine<Coin> = StateMachine::new();
/// turnstile.add_state("locked").unwrap();
/// turnstile.add_state("unlocked").unwrap();
/// turnstile
///     .add_transition("locked", TransitionBuilder::on("Coin").to("unlocked"))
///     .unwrap();
///
/// assert_eq!(turnstile.process_event(&Coin).unwrap(), Dispatch::Fired);
/// assert!(turnstile.is_in("unlocked"));
/// assert_eq!(turnstile.process_event(&Coin).unwrap(), Dispatch::Ignored);
/// ```
pub struct StateMachine<E: Event> {
    pub(crate) core: Rc<RefCell<Core<E>>>,
}

impl<E: Event> StateMachine<E> {
    /// Create an empty, active machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create an empty machine. `config.active` selects whether it starts
    /// active or suspended.
    pub fn with_config(config: MachineConfig) -> Self {
        Self::from_parts(Vec::new(), None, config)
    }

    pub(crate) fn from_parts(
        states: Vec<Rc<State<E>>>,
        start: Option<usize>,
        config: MachineConfig,
    ) -> Self {
        Self {
            core: Rc::new(RefCell::new(Core {
                states,
                start,
                current: start,
                active: config.active,
                config,
                history: StateHistory::new(),
            })),
        }
    }

    /// A non-owning handle, for capture by callbacks.
    pub fn downgrade(&self) -> WeakMachine<E> {
        WeakMachine {
            core: Rc::downgrade(&self.core),
        }
    }

    /// Whether two handles refer to the same machine.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    pub fn config(&self) -> MachineConfig {
        self.core.borrow().config
    }

    pub fn set_call_actions_on_reset(&self, call: bool) {
        self.core.borrow_mut().config.call_actions_on_reset = call;
    }

    pub fn set_call_actions_on_suspend(&self, call: bool) {
        self.core.borrow_mut().config.call_actions_on_suspend = call;
    }

    pub fn set_call_actions_on_resume(&self, call: bool) {
        self.core.borrow_mut().config.call_actions_on_resume = call;
    }

    pub fn set_record_history(&self, record: bool) {
        self.core.borrow_mut().config.record_history = record;
    }

    // ---- builder surface

    /// Add a state. The first state added becomes the start state and the
    /// current state.
    pub fn add_state(&self, state: impl Into<StateBuilder<E>>) -> Result<StateId, MachineError> {
        self.add_state_with_id(state.into(), None)
    }

    /// Add a state carrying an existing canonical identity, as template
    /// instances do. `None` mints a fresh one.
    pub(crate) fn add_state_with_id(
        &self,
        builder: StateBuilder<E>,
        id: Option<StateId>,
    ) -> Result<StateId, MachineError> {
        let mut core = self.core.borrow_mut();

        if core.position(&StateRef::Name(builder.name.clone())).is_some() {
            return Err(MachineError::StateAlreadyExists(builder.name));
        }

        let mut state = State::new(builder.name, builder.enter, builder.leave);
        if let Some(id) = id {
            state.id = id;
        }
        let id = state.id();
        core.states.push(Rc::new(state));
        if core.start.is_none() {
            let index = core.states.len() - 1;
            core.start = Some(index);
            core.current = Some(index);
        }
        Ok(id)
    }

    /// Add a transition leaving `source`, after every transition already
    /// declared on it.
    ///
    /// Fails with [`MachineError::StateNotFound`] if `source` is not a state
    /// of this machine and with [`MachineError::InvalidDestination`] if the
    /// builder's destination is not.
    pub fn add_transition(
        &self,
        source: impl Into<StateRef>,
        transition: TransitionBuilder<E>,
    ) -> Result<Rc<Transition<E>>, MachineError> {
        let source = source.into();
        let mut core = self.core.borrow_mut();

        let source_index = core
            .position(&source)
            .ok_or_else(|| MachineError::StateNotFound(source.to_string()))?;

        let destination = match transition.destination() {
            Some(target) => {
                let index = core
                    .position(target)
                    .ok_or_else(|| MachineError::InvalidDestination(target.to_string()))?;
                let state = &core.states[index];
                Some(Destination {
                    index,
                    id: state.id(),
                    name: state.name().to_string(),
                })
            }
            None => None,
        };

        let source_state = Rc::make_mut(&mut core.states[source_index]);
        let transition = Rc::new(transition.build(source_state.id(), destination));
        source_state.transitions.push(Rc::clone(&transition));
        Ok(transition)
    }

    /// Resolve a state by name or canonical identity.
    pub fn find_state(&self, reference: impl Into<StateRef>) -> Option<Rc<State<E>>> {
        let reference = reference.into();
        let core = self.core.borrow();
        core.position(&reference).map(|i| Rc::clone(&core.states[i]))
    }

    /// Make `reference` the state entered on reset. The current state is
    /// left alone.
    pub fn set_start_state(&self, reference: impl Into<StateRef>) -> Result<(), MachineError> {
        let reference = reference.into();
        let mut core = self.core.borrow_mut();
        let index = core
            .position(&reference)
            .ok_or_else(|| MachineError::StateNotFound(reference.to_string()))?;
        core.start = Some(index);
        Ok(())
    }

    // ---- inspection

    pub fn current_state(&self) -> Option<Rc<State<E>>> {
        self.core.borrow().current_state()
    }

    pub fn start_state(&self) -> Option<Rc<State<E>>> {
        let core = self.core.borrow();
        core.start.map(|i| Rc::clone(&core.states[i]))
    }

    /// True if the current state is `reference`, by name or identity.
    pub fn is_in(&self, reference: impl Into<StateRef>) -> bool {
        let reference = reference.into();
        let core = self.core.borrow();
        core.current
            .is_some_and(|i| core.states[i].is(&reference))
    }

    /// Whether events are processed. Also false while reset, suspend and
    /// resume run their actions.
    pub fn is_active(&self) -> bool {
        self.core.borrow().active
    }

    pub fn state_count(&self) -> usize {
        self.core.borrow().states.len()
    }

    /// Transitions fired so far, when `record_history` is on.
    pub fn history(&self) -> StateHistory {
        self.core.borrow().history.clone()
    }

    pub fn clear_history(&self) {
        self.core.borrow_mut().history.clear();
    }

    // ---- event processing

    /// Feed one event to the machine.
    ///
    /// The first transition of the current state accepting the event fires.
    /// With a destination, the current state's leave action runs, then the
    /// transition action, then the current state becomes the destination and
    /// its enter action runs. A self-loop only runs the transition action.
    ///
    /// The first failing action aborts the sequence and its error is
    /// returned; the current state only changes once the leave and
    /// transition actions have succeeded.
    pub fn process_event(&self, event: &E) -> Result<Dispatch, ActionError> {
        let current = {
            let core = self.core.borrow();
            if !core.active {
                debug!(event = %event.kind(), "machine inactive; event dropped");
                return Ok(Dispatch::Inactive);
            }
            match core.current_state() {
                Some(state) => state,
                None => return Ok(Dispatch::Ignored),
            }
        };

        let Some(transition) = current.get_transition(event).cloned() else {
            debug!(state = %current.name(), event = %event.kind(), "no transition; event ignored");
            return Ok(Dispatch::Ignored);
        };

        match transition.destination() {
            Some(destination) => {
                current.run_leave()?;
                transition.run_action(event)?;
                let next = {
                    let mut core = self.core.borrow_mut();
                    core.current = Some(destination.index);
                    Rc::clone(&core.states[destination.index])
                };
                debug!(
                    from = %current.name(),
                    to = %next.name(),
                    event = %event.kind(),
                    "transition fired"
                );
                self.record(current.name(), next.name(), event);
                next.run_enter()?;
            }
            None => {
                transition.run_action(event)?;
                debug!(state = %current.name(), event = %event.kind(), "self-loop fired");
                self.record(current.name(), current.name(), event);
            }
        }
        Ok(Dispatch::Fired)
    }

    fn record(&self, from: &str, to: &str, event: &E) {
        let mut core = self.core.borrow_mut();
        if core.config.record_history {
            core.history.record(StateTransition {
                from: from.to_string(),
                to: to.to_string(),
                event: event.kind().to_string(),
                timestamp: Utc::now(),
            });
        }
    }

    /// Return to the start state.
    ///
    /// With `call_actions_on_reset`, an active machine not already in its
    /// start state runs the current state's leave action and then the start
    /// state's enter action, while marked inactive. The machine is active
    /// again afterwards, even if an action failed.
    pub fn reset(&self) -> Result<(), ActionError> {
        let (leaving, start) = {
            let mut core = self.core.borrow_mut();
            let Some(start) = core.start else {
                return Ok(());
            };
            let call = core.config.call_actions_on_reset
                && core.active
                && core.current != Some(start);
            if !call {
                core.current = Some(start);
                debug!(state = %core.states[start].name(), "reset");
                return Ok(());
            }
            core.active = false;
            (core.current_state(), start)
        };

        let result = self.reset_with_actions(leaving, start);
        self.core.borrow_mut().active = true;
        result
    }

    fn reset_with_actions(
        &self,
        leaving: Option<Rc<State<E>>>,
        start: usize,
    ) -> Result<(), ActionError> {
        if let Some(state) = leaving {
            state.run_leave()?;
        }
        let entering = {
            let mut core = self.core.borrow_mut();
            core.current = Some(start);
            Rc::clone(&core.states[start])
        };
        debug!(state = %entering.name(), "reset with actions");
        entering.run_enter()
    }

    /// Stop processing events.
    ///
    /// With `call_actions_on_suspend`, an active machine runs the current
    /// state's leave action after being marked inactive. The machine is
    /// inactive afterwards in every case.
    pub fn suspend(&self) -> Result<(), ActionError> {
        let leaving = {
            let mut core = self.core.borrow_mut();
            let call = core.config.call_actions_on_suspend && core.active;
            core.active = false;
            if call {
                core.current_state()
            } else {
                None
            }
        };
        debug!("suspend");
        match leaving {
            Some(state) => state.run_leave(),
            None => Ok(()),
        }
    }

    /// Start processing events again.
    ///
    /// With `call_actions_on_resume`, an inactive machine runs the current
    /// state's enter action while still marked inactive, then becomes
    /// active. If that action fails the machine stays inactive.
    pub fn resume(&self) -> Result<(), ActionError> {
        let entering = {
            let core = self.core.borrow();
            if core.config.call_actions_on_resume && !core.active {
                core.current_state()
            } else {
                None
            }
        };
        debug!("resume");
        if let Some(state) = entering {
            state.run_enter()?;
        }
        self.core.borrow_mut().active = true;
        Ok(())
    }

    /// Run the start state's enter action while marked inactive, as a
    /// freshly instantiated template does.
    pub(crate) fn enter_initial(&self) -> Result<(), ActionError> {
        let entering = {
            let mut core = self.core.borrow_mut();
            let Some(state) = core.current_state() else {
                return Ok(());
            };
            core.active = false;
            state
        };
        let result = entering.run_enter();
        self.core.borrow_mut().active = true;
        result
    }
}

impl<E: Event> Default for StateMachine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> Clone for StateMachine<E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<E: Event> fmt::Debug for StateMachine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("StateMachine")
            .field("states", &core.states.len())
            .field(
                "current",
                &core.current.map(|i| core.states[i].name().to_string()),
            )
            .field("active", &core.active)
            .finish()
    }
}

/// Non-owning handle to a [`StateMachine`].
pub struct WeakMachine<E: Event> {
    core: Weak<RefCell<Core<E>>>,
}

impl<E: Event> WeakMachine<E> {
    pub fn upgrade(&self) -> Option<StateMachine<E>> {
        self.core.upgrade().map(|core| StateMachine { core })
    }

    /// Shorthand for upgrading and asking [`StateMachine::is_active`].
    /// False once the machine is gone.
    pub fn is_active(&self) -> bool {
        self.upgrade().is_some_and(|m| m.is_active())
    }
}

impl<E: Event> Clone for WeakMachine<E> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
        }
    }
}
