//! Transitions: conditional edges between states.

use super::event::{Event, MatchArg};
use super::guard::Guard;
use super::state::StateId;
use crate::error::ActionError;
use std::fmt;
use std::rc::Rc;

/// Callback run when a transition fires. Receives the triggering event.
pub type Action<E> = Rc<dyn Fn(&E) -> Result<(), ActionError>>;

/// Zero-argument callback run when a state is entered or left.
pub type Hook = Rc<dyn Fn() -> Result<(), ActionError>>;

/// Resolved destination of a transition inside its owning machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    pub(crate) index: usize,
    pub(crate) id: StateId,
    pub(crate) name: String,
}

impl Destination {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An edge from one state, matched against an event kind, match arguments
/// and an optional guard.
///
/// A transition without destination is a self-loop: firing it runs the
/// action only, never the leave/enter actions, and the current state keeps
/// its identity.
///
/// Transitions are created through
/// [`StateMachine::add_transition`](crate::machine::StateMachine::add_transition),
/// which resolves the destination against the machine's own states.
/// Destination, guard and action are set on the
/// [`TransitionBuilder`](crate::builder::TransitionBuilder) beforehand; once
/// added, a transition is immutable and shared with every machine copied
/// from the same state. A running machine changes its behaviour by adding
/// states and transitions, which later events see.
pub struct Transition<E: Event> {
    pub(crate) source: StateId,
    pub(crate) event_kind: E::Kind,
    pub(crate) match_args: Vec<MatchArg>,
    pub(crate) guard: Option<Guard<E>>,
    pub(crate) action: Option<Action<E>>,
    pub(crate) destination: Option<Destination>,
}

impl<E: Event> Transition<E> {
    /// Identity of the state this transition leaves from.
    pub fn source(&self) -> StateId {
        self.source
    }

    pub fn event_kind(&self) -> &E::Kind {
        &self.event_kind
    }

    /// Extra values passed to [`Event::matches`] for shape matching.
    pub fn match_args(&self) -> &[MatchArg] {
        &self.match_args
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn is_self_loop(&self) -> bool {
        self.destination.is_none()
    }

    /// Check kind, shape and guard, in that order.
    ///
    /// Shape matching is skipped when the kind differs, and the guard only
    /// runs once the shape matched.
    pub fn accepts(&self, event: &E) -> bool {
        if event.kind() != self.event_kind {
            return false;
        }
        if !event.matches(self) {
            return false;
        }
        self.guard.as_ref().is_none_or(|g| g.check(event))
    }

    /// Run the transition action, if any.
    pub fn run_action(&self, event: &E) -> Result<(), ActionError> {
        match &self.action {
            Some(action) => action(event),
            None => Ok(()),
        }
    }

    /// Stable human-readable label used for diagnostics.
    ///
    /// ```text
    /// transition on Press with Button1 to state wait
    /// transition on Move with guard to state drag
    /// transition on Move to itself
    /// ```
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

fn write_arg(f: &mut fmt::Formatter<'_>, arg: &MatchArg) -> fmt::Result {
    match arg {
        MatchArg::String(s) => f.write_str(s),
        other => write!(f, "{other}"),
    }
}

impl<E: Event> fmt::Display for Transition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition on {}", self.event_kind)?;
        if !self.match_args.is_empty() {
            f.write_str(" with ")?;
            for (i, arg) in self.match_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_arg(f, arg)?;
            }
        }
        if self.guard.is_some() {
            f.write_str(" with guard")?;
        }
        match &self.destination {
            Some(dest) => write!(f, " to state {}", dest.name),
            None => f.write_str(" to itself"),
        }
    }
}

impl<E: Event> fmt::Debug for Transition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("label", &self.to_string())
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Debug)]
    struct Click {
        button: &'static str,
    }

    impl Event for Click {
        type Kind = &'static str;

        fn kind(&self) -> Self::Kind {
            "Click"
        }

        fn matches(&self, transition: &Transition<Self>) -> bool {
            transition
                .match_args()
                .first()
                .is_none_or(|b| b == self.button)
        }
    }

    struct Other;

    impl Event for Other {
        type Kind = &'static str;

        fn kind(&self) -> Self::Kind {
            "Other"
        }
    }

    fn transition(args: Vec<MatchArg>, guard: Option<Guard<Click>>) -> Transition<Click> {
        Transition {
            source: StateId::new(),
            event_kind: "Click",
            match_args: args,
            guard,
            action: None,
            destination: None,
        }
    }

    #[test]
    fn accepts_checks_kind_then_shape_then_guard() {
        let t = transition(vec![json!("left")], Some(Guard::new(|_| true)));

        assert!(t.accepts(&Click { button: "left" }));
        assert!(!t.accepts(&Click { button: "right" }));
    }

    #[test]
    fn guard_is_not_consulted_when_shape_fails() {
        let consulted = std::rc::Rc::new(std::cell::Cell::new(false));
        let flag = std::rc::Rc::clone(&consulted);
        let t = transition(
            vec![json!("left")],
            Some(Guard::new(move |_| {
                flag.set(true);
                true
            })),
        );

        assert!(!t.accepts(&Click { button: "right" }));
        assert!(!consulted.get());
    }

    #[test]
    fn kind_mismatch_rejects() {
        let t: Transition<Other> = Transition {
            source: StateId::new(),
            event_kind: "Something",
            match_args: Vec::new(),
            guard: None,
            action: None,
            destination: None,
        };

        assert!(!t.accepts(&Other));
    }

    #[test]
    fn run_action_passes_the_event() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut t = transition(Vec::new(), None);
        t.action = Some(Rc::new(move |e: &Click| {
            log.borrow_mut().push(e.button);
            Ok(())
        }));

        t.run_action(&Click { button: "left" }).unwrap();

        assert_eq!(*seen.borrow(), vec!["left"]);
    }

    #[test]
    fn describe_lists_args_guard_and_destination() {
        let mut t = transition(vec![json!("Button1")], None);
        assert_eq!(t.describe(), "transition on Click with Button1 to itself");

        t.guard = Some(Guard::new(|_| true));
        t.destination = Some(Destination {
            index: 1,
            id: StateId::new(),
            name: "wait".to_string(),
        });
        assert_eq!(
            t.describe(),
            "transition on Click with Button1 with guard to state wait"
        );
    }

    #[test]
    fn describe_renders_non_string_args() {
        let t = transition(vec![json!(1), json!("a")], None);
        assert_eq!(t.describe(), "transition on Click with 1, a to itself");
    }
}
