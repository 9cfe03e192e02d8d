//! Lifecycle phases and the typed values exchanged with hooks.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use troika_core::error::AppError;

pub use troika_core::config::Requirement;

/// Points in a job's lifecycle at which hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fired once when the submission tool starts.
    AtStartup,
    /// Fired right before the job is handed to the batch system. Can halt.
    PreSubmit,
    /// Fired once when the submission tool exits.
    AtExit,
}

impl Phase {
    /// All phases, in lifecycle order.
    pub const ALL: [Phase; 3] = [Phase::AtStartup, Phase::PreSubmit, Phase::AtExit];

    /// Returns the string name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtStartup => "at_startup",
            Self::PreSubmit => "pre_submit",
            Self::AtExit => "at_exit",
        }
    }

    /// Returns whether a hook at this phase may stop the workflow.
    pub fn can_halt(&self) -> bool {
        matches!(self, Self::PreSubmit)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Phase {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Unknown lifecycle phase '{s}' (expected one of: at_startup, pre_submit, at_exit)"
                ))
            })
    }
}

/// Payload passed to hooks: a flexible key-value map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookPayload {
    /// The phase being fired.
    pub phase: Phase,
    /// Site the job is submitted to.
    pub site: String,
    /// Arbitrary data keyed by string.
    pub data: HashMap<String, serde_json::Value>,
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
}

impl HookPayload {
    /// Creates a new hook payload.
    pub fn new(phase: Phase, site: impl Into<String>) -> Self {
        Self {
            phase,
            site: site.into(),
            data: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Inserts a typed data value.
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts a boolean value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Gets a data value by key.
    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a string data value.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 data value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool data value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(|v| v.as_bool())
    }
}

/// Action returned by a hook telling the dispatcher what to do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookAction {
    /// Continue to the next hook.
    Continue,
    /// Halt: no further hooks run and the submission is aborted.
    /// Only honoured at phases where [`Phase::can_halt`] holds.
    Halt {
        /// Reason for halting.
        reason: String,
    },
}

/// Result returned from a hook invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookResult {
    /// The action the hook wants the dispatcher to take.
    pub action: HookAction,
    /// Optional output data from the hook.
    pub output: Option<serde_json::Value>,
    /// Hook kind that produced this result.
    pub hook: String,
}

impl HookResult {
    /// Creates a continue result.
    pub fn continue_execution(hook: &str) -> Self {
        Self {
            action: HookAction::Continue,
            output: None,
            hook: hook.to_string(),
        }
    }

    /// Creates a continue result with output data.
    pub fn continue_with_output(hook: &str, output: serde_json::Value) -> Self {
        Self {
            action: HookAction::Continue,
            output: Some(output),
            hook: hook.to_string(),
        }
    }

    /// Creates a halt result.
    pub fn halt(hook: &str, reason: &str) -> Self {
        Self {
            action: HookAction::Halt {
                reason: reason.to_string(),
            },
            output: None,
            hook: hook.to_string(),
        }
    }

    /// Returns whether the hook asked to halt.
    pub fn is_halt(&self) -> bool {
        matches!(self.action, HookAction::Halt { .. })
    }
}
