//! Builder for declaring states.

use crate::core::{Event, Hook};
use crate::error::ActionError;
use std::marker::PhantomData;
use std::rc::Rc;

/// Builder for a state: a name plus optional enter/leave actions.
///
/// `&str` and `String` convert into a builder without actions, so
/// `machine.add_state("wait")` works directly.
pub struct StateBuilder<E: Event> {
    pub(crate) name: String,
    pub(crate) enter: Option<Hook>,
    pub(crate) leave: Option<Hook>,
    _phantom: PhantomData<E>,
}

impl<E: Event> StateBuilder<E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enter: None,
            leave: None,
            _phantom: PhantomData,
        }
    }

    /// Set an enter action that cannot fail.
    pub fn on_enter<F>(self, enter: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.try_on_enter(move || {
            enter();
            Ok(())
        })
    }

    /// Set a fallible enter action.
    pub fn try_on_enter<F>(mut self, enter: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + 'static,
    {
        self.enter = Some(Rc::new(enter));
        self
    }

    /// Set a leave action that cannot fail.
    pub fn on_leave<F>(self, leave: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.try_on_leave(move || {
            leave();
            Ok(())
        })
    }

    /// Set a fallible leave action.
    pub fn try_on_leave<F>(mut self, leave: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + 'static,
    {
        self.leave = Some(Rc::new(leave));
        self
    }

    /// Use an already shared hook as the enter action.
    pub fn enter_hook(mut self, hook: Hook) -> Self {
        self.enter = Some(hook);
        self
    }

    /// Use an already shared hook as the leave action.
    pub fn leave_hook(mut self, hook: Hook) -> Self {
        self.leave = Some(hook);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E: Event> From<&str> for StateBuilder<E> {
    fn from(name: &str) -> Self {
        StateBuilder::new(name)
    }
}

impl<E: Event> From<String> for StateBuilder<E> {
    fn from(name: String) -> Self {
        StateBuilder::new(name)
    }
}
