//! States and their canonical identity.

use super::event::Event;
use super::transition::{Hook, Transition};
use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Canonical identity of a state.
///
/// A state built from scratch gets a fresh id. Instantiating a
/// [`MachineTemplate`](crate::machine::MachineTemplate) copies the
/// template's ids, so the copies compare equal to the template's states and
/// to each other while remaining distinct objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(Uuid);

impl StateId {
    pub fn new() -> Self {
        StateId(Uuid::new_v4())
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to a state of a machine: by name or by canonical identity.
///
/// Builder and query methods accept anything convertible into a
/// `StateRef`, so `"wait"`, a [`StateId`] and a `&State` all work.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateRef {
    Name(String),
    Id(StateId),
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateRef::Name(name) => f.write_str(name),
            StateRef::Id(id) => write!(f, "#{id}"),
        }
    }
}

impl From<&str> for StateRef {
    fn from(name: &str) -> Self {
        StateRef::Name(name.to_string())
    }
}

impl From<String> for StateRef {
    fn from(name: String) -> Self {
        StateRef::Name(name)
    }
}

impl From<&String> for StateRef {
    fn from(name: &String) -> Self {
        StateRef::Name(name.clone())
    }
}

impl From<StateId> for StateRef {
    fn from(id: StateId) -> Self {
        StateRef::Id(id)
    }
}

impl<E: Event> From<&State<E>> for StateRef {
    fn from(state: &State<E>) -> Self {
        StateRef::Id(state.id)
    }
}

impl<E: Event> From<&Rc<State<E>>> for StateRef {
    fn from(state: &Rc<State<E>>) -> Self {
        StateRef::Id(state.id)
    }
}

/// A named node of a state machine.
///
/// A state owns its outgoing transitions in declaration order and optional
/// enter/leave actions. Equality is canonical identity, never structure:
/// two states are equal iff their [`StateId`]s are.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::Event;
/// use eventfsm::machine::StateMachine;
///
/// struct Tick;
/// impl Event for Tick {
///     type Kind = &'static str;
///     fn kind(&self) -> Self::Kind {
///         "Tick"
///     }
/// }
///
/// let machine: StateMachine<Tick> = StateMachine::new();
/// let idle = machine.add_state("idle").unwrap();
///
/// let state = machine.find_state("idle").unwrap();
/// assert_eq!(state.id(), idle);
/// assert_eq!(state.to_string(), "state idle");
/// ```
pub struct State<E: Event> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) enter: Option<Hook>,
    pub(crate) leave: Option<Hook>,
    pub(crate) transitions: Vec<Rc<Transition<E>>>,
}

impl<E: Event> State<E> {
    pub(crate) fn new(name: String, enter: Option<Hook>, leave: Option<Hook>) -> Self {
        Self {
            id: StateId::new(),
            name,
            enter,
            leave,
            transitions: Vec::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if `reference` designates this state: same name, or same
    /// canonical identity.
    pub fn is(&self, reference: &StateRef) -> bool {
        match reference {
            StateRef::Name(name) => self.name == *name,
            StateRef::Id(id) => self.id == *id,
        }
    }

    pub fn has_enter(&self) -> bool {
        self.enter.is_some()
    }

    pub fn has_leave(&self) -> bool {
        self.leave.is_some()
    }

    /// Outgoing transitions in declaration order.
    pub fn transitions(&self) -> &[Rc<Transition<E>>] {
        &self.transitions
    }

    /// Return the first transition, in declaration order, whose kind, shape
    /// and guard all accept `event`.
    pub fn get_transition(&self, event: &E) -> Option<&Rc<Transition<E>>> {
        self.transitions.iter().find(|t| {
            tracing::trace!(state = %self.name, candidate = %t, "trying transition");
            t.accepts(event)
        })
    }

    /// Run the enter action. A missing action is a no-op.
    pub fn run_enter(&self) -> Result<(), ActionError> {
        match &self.enter {
            Some(enter) => enter(),
            None => Ok(()),
        }
    }

    /// Run the leave action. A missing action is a no-op.
    pub fn run_leave(&self) -> Result<(), ActionError> {
        match &self.leave {
            Some(leave) => leave(),
            None => Ok(()),
        }
    }
}

impl<E: Event> Clone for State<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            enter: self.enter.clone(),
            leave: self.leave.clone(),
            transitions: self.transitions.clone(),
        }
    }
}

impl<E: Event> PartialEq for State<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Event> Eq for State<E> {}

impl<E: Event> fmt::Display for State<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {}", self.name)
    }
}

impl<E: Event> fmt::Debug for State<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
