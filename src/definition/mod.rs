//! Machines described as data.
//!
//! A [`MachineDefinition`] lists states and transitions and refers to
//! callbacks by name. Names are resolved against a [`Registry`]:
//!
//! - `validate` reports every unknown name, duplicate state and dangling
//!   destination at once, as a `stillwater` `Validation`
//! - `compile` builds a [`MachineTemplate`](crate::machine::MachineTemplate)
//!   and stops at the first error

mod registry;
mod schema;

pub use registry::Registry;
pub use schema::{MachineDefinition, StateDefinition, TransitionDefinition};
