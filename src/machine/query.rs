//! Read-only queries over a machine's states and transitions.
//!
//! Every iterator works on a snapshot taken when it is created: states and
//! transitions added afterwards are not seen, and cloning an iterator
//! restarts from the clone's position.

use crate::core::{Event, State, StateId, StateRef, Transition};
use crate::error::MachineError;
use crate::machine::machine::StateMachine;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Filter {
    All,
    From(StateId),
    To(StateId),
    Between(StateId, StateId),
}

impl Filter {
    fn visits<E: Event>(&self, state: &State<E>) -> bool {
        match self {
            Filter::From(source) | Filter::Between(source, _) => state.id() == *source,
            Filter::All | Filter::To(_) => true,
        }
    }

    fn keeps<E: Event>(&self, state: &State<E>, transition: &Transition<E>) -> bool {
        match self {
            Filter::All | Filter::From(_) => true,
            Filter::To(target) | Filter::Between(_, target) => lands_on(state, transition, *target),
        }
    }
}

/// A transition lands on `target` if its destination is `target`, or if it
/// is a self-loop of `target` itself.
fn lands_on<E: Event>(state: &State<E>, transition: &Transition<E>, target: StateId) -> bool {
    match transition.destination() {
        Some(destination) => destination.id() == target,
        None => state.id() == target,
    }
}

/// Lazy iterator over a snapshot of a machine's transitions, grouped by
/// source state in declaration order.
pub struct Transitions<E: Event> {
    states: Rc<[Rc<State<E>>]>,
    filter: Filter,
    state_pos: usize,
    transition_pos: usize,
}

impl<E: Event> Transitions<E> {
    fn new(states: Rc<[Rc<State<E>>]>, filter: Filter) -> Self {
        Self {
            states,
            filter,
            state_pos: 0,
            transition_pos: 0,
        }
    }

    fn next_state(&mut self) {
        self.state_pos += 1;
        self.transition_pos = 0;
    }
}

impl<E: Event> Iterator for Transitions<E> {
    type Item = Rc<Transition<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = Rc::clone(self.states.get(self.state_pos)?);
            if !self.filter.visits(&state) {
                self.next_state();
                continue;
            }
            match state.transitions().get(self.transition_pos) {
                Some(transition) => {
                    self.transition_pos += 1;
                    if self.filter.keeps(&state, transition) {
                        return Some(Rc::clone(transition));
                    }
                }
                None => self.next_state(),
            }
        }
    }
}

impl<E: Event> Clone for Transitions<E> {
    fn clone(&self) -> Self {
        Self {
            states: Rc::clone(&self.states),
            filter: self.filter,
            state_pos: self.state_pos,
            transition_pos: self.transition_pos,
        }
    }
}

impl<E: Event> StateMachine<E> {
    fn snapshot(&self) -> Rc<[Rc<State<E>>]> {
        self.core.borrow().states.iter().cloned().collect()
    }

    fn resolve(&self, reference: impl Into<StateRef>) -> Result<StateId, MachineError> {
        let reference = reference.into();
        self.find_state(reference.clone())
            .map(|state| state.id())
            .ok_or_else(|| MachineError::StateNotFound(reference.to_string()))
    }

    /// All states, in declaration order.
    pub fn all_states(&self) -> std::vec::IntoIter<Rc<State<E>>> {
        self.core.borrow().states.clone().into_iter()
    }

    /// All transitions of all states, grouped by source state.
    pub fn all_transitions(&self) -> Transitions<E> {
        Transitions::new(self.snapshot(), Filter::All)
    }

    /// Transitions leaving `source`.
    pub fn transitions_from(
        &self,
        source: impl Into<StateRef>,
    ) -> Result<Transitions<E>, MachineError> {
        let source = self.resolve(source)?;
        Ok(Transitions::new(self.snapshot(), Filter::From(source)))
    }

    /// Transitions arriving at `target`, including self-loops of `target`.
    pub fn transitions_to(
        &self,
        target: impl Into<StateRef>,
    ) -> Result<Transitions<E>, MachineError> {
        let target = self.resolve(target)?;
        Ok(Transitions::new(self.snapshot(), Filter::To(target)))
    }

    /// Transitions from `source` to `target`. When both are the same state
    /// this includes its self-loops.
    pub fn transitions_between(
        &self,
        source: impl Into<StateRef>,
        target: impl Into<StateRef>,
    ) -> Result<Transitions<E>, MachineError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        Ok(Transitions::new(
            self.snapshot(),
            Filter::Between(source, target),
        ))
    }

    /// Pick the query from the references given: both, source only, target
    /// only, or neither for all transitions.
    pub fn transitions(
        &self,
        source: Option<StateRef>,
        target: Option<StateRef>,
    ) -> Result<Transitions<E>, MachineError> {
        match (source, target) {
            (Some(source), Some(target)) => self.transitions_between(source, target),
            (Some(source), None) => self.transitions_from(source),
            (None, Some(target)) => self.transitions_to(target),
            (None, None) => Ok(self.all_transitions()),
        }
    }
}
