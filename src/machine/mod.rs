//! The runtime machine and its shell around the core model.
//!
//! # Key Concepts
//!
//! - **StateMachine**: Shared handle that owns states and dispatches events
//! - **Queries**: Snapshot iterators over states and transitions
//! - **Templates**: Instantiate independent machines sharing one structure
//!
//! Callbacks may hold a [`WeakMachine`] and call back into the machine that
//! runs them. No internal borrow is held while a callback runs.

mod config;
#[allow(clippy::module_inception)]
mod machine;
mod query;
mod template;

pub use config::MachineConfig;
pub use machine::{Dispatch, StateMachine, WeakMachine};
pub use query::Transitions;
pub use template::MachineTemplate;
