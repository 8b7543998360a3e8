//! History of fired transitions.
//!
//! A machine configured with `record_history` appends one record per fired
//! transition. Lifecycle operations (reset, suspend, resume) are not
//! recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single fired transition.
///
/// Self-loops are recorded with `to == from`.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "start".to_string(),
///     to: "wait".to_string(),
///     event: "Press".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_self_loop());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Name of the state the transition left from
    pub from: String,
    /// Name of the state current after the transition
    pub to: String,
    /// Kind of the triggering event, as displayed
    pub event: String,
    /// When the transition fired
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of fired transitions.
///
/// # Example
///
/// ```rust
/// use eventfsm::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition {
///     from: "start".to_string(),
///     to: "wait".to_string(),
///     event: "Press".to_string(),
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: "wait".to_string(),
///     to: "drag".to_string(),
///     event: "Move".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec!["start", "wait", "drag"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a fired transition.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
    }

    /// Names of the states traversed: the first source, then the
    /// destination of each transition.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// `None` when nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
