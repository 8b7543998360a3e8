//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Settings controlling whether a machine starts active and whether
/// lifecycle operations run enter/leave actions.
///
/// Missing fields take their default when deserialized, so `{}` is a valid
/// configuration.
///
/// # Example
///
/// ```rust
/// use eventfsm::machine::MachineConfig;
///
/// let config = MachineConfig::new().active(false).call_actions(true);
///
/// assert!(!config.active);
/// assert!(config.call_actions_on_reset);
/// assert!(config.call_actions_on_suspend);
/// assert!(config.call_actions_on_resume);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Whether the machine processes events as soon as it is created
    pub active: bool,
    /// Run leave/enter when `reset` moves the machine back to its start state
    pub call_actions_on_reset: bool,
    /// Run the current state's leave action on `suspend`
    pub call_actions_on_suspend: bool,
    /// Run the current state's enter action on `resume`
    pub call_actions_on_resume: bool,
    /// Record fired transitions in a `StateHistory`.
    ///
    /// The history is unbounded: it keeps every fired transition until
    /// `StateMachine::clear_history` is called.
    pub record_history: bool,
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the three lifecycle action flags at once.
    pub fn call_actions(self, call: bool) -> Self {
        self.call_actions_on_reset(call)
            .call_actions_on_suspend(call)
            .call_actions_on_resume(call)
    }

    pub fn call_actions_on_reset(mut self, call: bool) -> Self {
        self.call_actions_on_reset = call;
        self
    }

    pub fn call_actions_on_suspend(mut self, call: bool) -> Self {
        self.call_actions_on_suspend = call;
        self
    }

    pub fn call_actions_on_resume(mut self, call: bool) -> Self {
        self.call_actions_on_resume = call;
        self
    }

    pub fn record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            active: true,
            call_actions_on_reset: false,
            call_actions_on_suspend: false,
            call_actions_on_resume: false,
            record_history: false,
        }
    }
}
