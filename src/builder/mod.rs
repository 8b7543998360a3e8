//! Builder API for ergonomic state machine construction.
//!
//! States and transitions are declared through fluent builders and handed
//! to a [`StateMachine`](crate::machine::StateMachine), or collected by a
//! [`StateMachineBuilder`] that assembles the whole machine at once.

mod machine;
mod state;
mod transition;

pub use machine::StateMachineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;
