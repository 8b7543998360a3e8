//! Guard predicates for controlling which transitions fire.
//!
//! Guards are boolean functions over an event. A transition whose kind and
//! shape match an event only fires if its guard (when present) also holds.

use super::event::Event;
use std::fmt;
use std::rc::Rc;

/// Predicate deciding whether an otherwise-matching transition fires.
///
/// Guards may read state captured by the closure (e.g. where a drag
/// started) but should not mutate the machine. They are cheap to clone and
/// shared between a template and its instances.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::{Event, Guard};
///
/// struct Move {
///     x: i32,
/// }
///
/// impl Event for Move {
///     type Kind = &'static str;
///     fn kind(&self) -> Self::Kind {
///         "Move"
///     }
/// }
///
/// let far_enough = Guard::new(|event: &Move| event.x.abs() > 5);
///
/// assert!(far_enough.check(&Move { x: 6 }));
/// assert!(!far_enough.check(&Move { x: 2 }));
/// ```
pub struct Guard<E: Event> {
    predicate: Rc<dyn Fn(&E) -> bool>,
}

impl<E: Event> Guard<E> {
    /// Create a guard from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Check if the guard lets this event through.
    pub fn check(&self, event: &E) -> bool {
        (self.predicate)(event)
    }
}

impl<E: Event> Clone for Guard<E> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<E: Event> fmt::Debug for Guard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
