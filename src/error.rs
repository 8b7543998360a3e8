//! Error types for building, querying and running state machines.

use thiserror::Error;

/// Errors raised while building or querying a state machine.
///
/// All of these surface at build time, when the offending state or
/// transition is added. Dispatch never produces a `MachineError`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{0}' not found in this machine")]
    StateNotFound(String),

    #[error("State '{0}' already exists in this machine")]
    StateAlreadyExists(String),

    #[error("Transition destination '{0}' is not a state of this machine")]
    InvalidDestination(String),

    #[error("Action '{0}' is not a registered action")]
    InvalidAction(String),

    #[error("Guard '{0}' is not a registered guard")]
    InvalidGuard(String),
}

/// Error returned by an enter, leave or transition action.
///
/// The engine never swallows these: the first failing callback aborts the
/// running operation and the error is handed back to the caller.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ActionError {
    /// Convenience constructor for a message-only failure.
    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }
}

/// Error returned when a template creates a machine.
///
/// Declared templates re-run their declarations for every instance, which
/// can fail like any build; the start state's initial enter action can fail
/// like any callback.
#[derive(Debug, Error)]
pub enum InstantiateError {
    #[error(transparent)]
    Build(#[from] MachineError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_errors_render_the_offending_name() {
        let err = MachineError::StateNotFound("drag".to_string());
        assert_eq!(err.to_string(), "State 'drag' not found in this machine");

        let err = MachineError::InvalidGuard("far_enough".to_string());
        assert_eq!(err.to_string(), "Guard 'far_enough' is not a registered guard");
    }

    #[test]
    fn action_error_wraps_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(io);
        let err = ActionError::from(boxed);

        assert_eq!(err.to_string(), "disk gone");
        assert!(matches!(ActionError::failed("x"), ActionError::Failed(m) if m == "x"));
    }

    #[test]
    fn instantiate_error_keeps_the_inner_message() {
        let err = InstantiateError::from(MachineError::StateNotFound("drag".to_string()));
        assert_eq!(err.to_string(), "State 'drag' not found in this machine");

        let err = InstantiateError::from(ActionError::failed("cold"));
        assert_eq!(err.to_string(), "Action failed: cold");
    }
}
