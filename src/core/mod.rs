//! Core data model of the engine.
//!
//! This module contains the leaves of the engine:
//! - The `Event` capability consumed by dispatch
//! - `State` with its canonical identity `StateId`
//! - `Transition` and its `Guard`
//! - `StateHistory` of fired transitions

mod event;
mod guard;
mod history;
mod state;
mod transition;

pub use event::{Event, MatchArg};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{State, StateId, StateRef};
pub use transition::{Action, Destination, Hook, Transition};
