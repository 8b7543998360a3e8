//! Named callbacks referenced by machine definitions.

use crate::core::{Action, Event, Guard, Hook};
use crate::error::{ActionError, MachineError};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Callbacks a [`MachineDefinition`](super::MachineDefinition) refers to by
/// name.
///
/// Hooks are used as enter/leave actions, actions run when a transition
/// fires, and guards decide whether a transition may fire.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::Event;
/// use eventfsm::definition::Registry;
///
/// struct Tick(u32);
/// impl Event for Tick {
///     type Kind = String;
///     fn kind(&self) -> Self::Kind {
///         "Tick".to_string()
///     }
/// }
///
/// let registry = Registry::<Tick>::new()
///     .hook("announce", || println!("entered"))
///     .guard("even", |t: &Tick| t.0 % 2 == 0);
///
/// assert!(registry.contains_hook("announce"));
/// assert!(registry.contains_guard("even"));
/// assert!(!registry.contains_action("announce"));
/// ```
pub struct Registry<E: Event> {
    hooks: HashMap<String, Hook>,
    actions: HashMap<String, Action<E>>,
    guards: HashMap<String, Guard<E>>,
}

impl<E: Event> Registry<E> {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
            actions: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Register an enter/leave action that cannot fail.
    pub fn hook<F>(self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.try_hook(name, move || {
            hook();
            Ok(())
        })
    }

    /// Register a fallible enter/leave action.
    pub fn try_hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + 'static,
    {
        self.hooks.insert(name.into(), Rc::new(hook));
        self
    }

    /// Register a transition action that cannot fail.
    pub fn action<F>(self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&E) + 'static,
    {
        self.try_action(name, move |event| {
            action(event);
            Ok(())
        })
    }

    /// Register a fallible transition action.
    pub fn try_action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&E) -> Result<(), ActionError> + 'static,
    {
        self.actions.insert(name.into(), Rc::new(action));
        self
    }

    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    pub fn contains_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    pub fn contains_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn contains_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    pub(crate) fn lookup_hook(&self, name: &str) -> Result<Hook, MachineError> {
        self.hooks
            .get(name)
            .cloned()
            .ok_or_else(|| MachineError::InvalidAction(name.to_string()))
    }

    pub(crate) fn lookup_action(&self, name: &str) -> Result<Action<E>, MachineError> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| MachineError::InvalidAction(name.to_string()))
    }

    pub(crate) fn lookup_guard(&self, name: &str) -> Result<Guard<E>, MachineError> {
        self.guards
            .get(name)
            .cloned()
            .ok_or_else(|| MachineError::InvalidGuard(name.to_string()))
    }
}

impl<E: Event> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks: Vec<&String> = self.hooks.keys().collect();
        let mut actions: Vec<&String> = self.actions.keys().collect();
        let mut guards: Vec<&String> = self.guards.keys().collect();
        hooks.sort();
        actions.sort();
        guards.sort();
        f.debug_struct("Registry")
            .field("hooks", &hooks)
            .field("actions", &actions)
            .field("guards", &guards)
            .finish()
    }
}
