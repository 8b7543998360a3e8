//! The Event capability consumed by the engine.
//!
//! The engine never owns events. It only needs a discriminable kind and a
//! shape-match predicate evaluated against a candidate transition.

use super::transition::Transition;
use std::fmt::Display;

/// Opaque value a transition carries to refine which events it accepts,
/// e.g. which mouse button a `Press` must come from.
pub type MatchArg = serde_json::Value;

/// Trait for events fed to a state machine.
///
/// `kind` selects the candidate transitions. `matches` is only consulted
/// once the kind matched, and receives the transition so it can inspect
/// [`Transition::match_args`]. By default every event of the right kind
/// matches.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::{Event, Transition};
///
/// struct Press {
///     button: &'static str,
/// }
///
/// impl Event for Press {
///     type Kind = &'static str;
///
///     fn kind(&self) -> Self::Kind {
///         "Press"
///     }
///
///     fn matches(&self, transition: &Transition<Self>) -> bool {
///         match transition.match_args().first() {
///             Some(button) => button == self.button,
///             None => true,
///         }
///     }
/// }
/// ```
pub trait Event: Sized + 'static {
    /// Discriminant compared against [`Transition::event_kind`].
    type Kind: Clone + PartialEq + Display;

    /// The kind of this event.
    fn kind(&self) -> Self::Kind;

    /// Refine the match once the kind is known to be equal.
    fn matches(&self, transition: &Transition<Self>) -> bool {
        let _ = transition;
        true
    }
}
