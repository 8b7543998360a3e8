//! Eventfsm: an event-driven finite state machine engine
//!
//! Applications declare named states with optional enter/leave actions and
//! transitions matched against incoming events, then feed events to the
//! machine one at a time. The first transition of the current state that
//! accepts an event fires, running the leave, transition and enter actions
//! in that order.
//!
//! # Core Concepts
//!
//! - **Event**: Anything with a kind and a shape-match predicate
//! - **State**: Named node owning ordered transitions, compared by canonical identity
//! - **Transition**: Edge matched by kind, match arguments and an optional guard
//! - **StateMachine**: Builder surface, queries, dispatch and lifecycle
//! - **Templates**: Many independent machines from one structure
//! - **Definitions**: Machines described as data, with named callbacks
//!
//! # Example
//!
//! ```rust
//! use eventfsm::{Dispatch, Event, StateMachine, Transition, TransitionBuilder};
//!
//! enum Input {
//!     Press(&'static str),
//!     Release(&'static str),
//! }
//!
//! impl Event for Input {
//!     type Kind = &'static str;
//!
//!     fn kind(&self) -> Self::Kind {
//!         match self {
//!             Input::Press(_) => "Press",
//!             Input::Release(_) => "Release",
//!         }
//!     }
//!
//!     fn matches(&self, transition: &Transition<Self>) -> bool {
//!         let button = match self {
//!             Input::Press(b) | Input::Release(b) => *b,
//!         };
//!         transition.match_args().iter().all(|arg| arg == button)
//!     }
//! }
//!
//! let machine = StateMachine::new();
//! machine.add_state("up").unwrap();
//! machine.add_state("down").unwrap();
//! machine
//!     .add_transition("up", TransitionBuilder::on("Press").arg("left").to("down"))
//!     .unwrap();
//! machine
//!     .add_transition("down", TransitionBuilder::on("Release").arg("left").to("up"))
//!     .unwrap();
//!
//! assert_eq!(machine.process_event(&Input::Press("right")).unwrap(), Dispatch::Ignored);
//! assert_eq!(machine.process_event(&Input::Press("left")).unwrap(), Dispatch::Fired);
//! assert!(machine.is_in("down"));
//! ```

pub mod builder;
pub mod core;
pub mod definition;
pub mod error;
pub mod machine;

// Re-export commonly used types
pub use builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
pub use core::{Event, Guard, MatchArg, State, StateHistory, StateId, StateRef, Transition};
pub use definition::{MachineDefinition, Registry};
pub use error::{ActionError, InstantiateError, MachineError};
pub use machine::{Dispatch, MachineConfig, MachineTemplate, StateMachine, WeakMachine};
