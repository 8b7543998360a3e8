//! Builder for constructing transitions.

use crate::core::{Action, Destination, Event, Guard, MatchArg, StateId, StateRef, Transition};
use crate::error::ActionError;
use std::rc::Rc;

/// Builder for constructing transitions with a fluent API.
///
/// The destination is kept as an unresolved [`StateRef`] until the builder
/// is handed to
/// [`StateMachine::add_transition`](crate::machine::StateMachine::add_transition),
/// which resolves it against that machine's states.
///
/// # Example
///
/// ```rust
/// use eventfsm::builder::TransitionBuilder;
/// use eventfsm::core::Event;
///
/// struct Release {
///     button: &'static str,
/// }
///
/// impl Event for Release {
///     type Kind = &'static str;
///     fn kind(&self) -> Self::Kind {
///         "Release"
///     }
/// }
///
/// let builder = TransitionBuilder::<Release>::on("Release")
///     .arg("Button1")
///     .to("start")
///     .action(|e: &Release| println!("released {}", e.button));
/// ```
pub struct TransitionBuilder<E: Event> {
    event_kind: E::Kind,
    match_args: Vec<MatchArg>,
    guard: Option<Guard<E>>,
    action: Option<Action<E>>,
    destination: Option<StateRef>,
}

impl<E: Event> TransitionBuilder<E> {
    /// Start a transition triggered by events of `kind`.
    pub fn on(kind: E::Kind) -> Self {
        Self {
            event_kind: kind,
            match_args: Vec::new(),
            guard: None,
            action: None,
            destination: None,
        }
    }

    /// Append one match argument.
    pub fn arg(mut self, arg: impl Into<MatchArg>) -> Self {
        self.match_args.push(arg.into());
        self
    }

    /// Append several match arguments, in order.
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MatchArg>,
    {
        self.match_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<E>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the destination (optional). Without one the transition is a
    /// self-loop.
    pub fn to(mut self, state: impl Into<StateRef>) -> Self {
        self.destination = Some(state.into());
        self
    }

    /// Set an action that cannot fail.
    pub fn action<F>(self, action: F) -> Self
    where
        F: Fn(&E) + 'static,
    {
        self.try_action(move |event| {
            action(event);
            Ok(())
        })
    }

    /// Set a fallible action.
    pub fn try_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&E) -> Result<(), ActionError> + 'static,
    {
        self.action = Some(Rc::new(action));
        self
    }

    /// Use an already shared action.
    pub fn action_handle(mut self, action: Action<E>) -> Self {
        self.action = Some(action);
        self
    }

    /// The unresolved destination, if any.
    pub fn destination(&self) -> Option<&StateRef> {
        self.destination.as_ref()
    }

    pub(crate) fn build(self, source: StateId, destination: Option<Destination>) -> Transition<E> {
        Transition {
            source,
            event_kind: self.event_kind,
            match_args: self.match_args,
            guard: self.guard,
            action: self.action,
            destination,
        }
    }
}
