//! The structured result object returned by every pipeline run.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved key holding the fatal-error message, when a stage failed after
/// acquisition.
pub const ERROR_KEY: &str = "error";
/// Reserved key holding the fatal error's diagnostic trace.
pub const ERROR_TRACE_KEY: &str = "error_stacktrace";

/// Accumulates warnings, stage artifacts, and at most one fatal-error pair
/// over the life of a run.
///
/// Created empty at run start, mutated additively by the orchestrator and
/// the post-processing collaborator, and returned to the caller regardless
/// of how far the run progressed. Callers must treat it as frozen once the
/// orchestrator returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Named stage artifacts, including the two reserved error keys.
    pub values: BTreeMap<String, Value>,
    /// Recoverable warnings in arrival order.
    pub warnings: Vec<String>,
}

impl RunOutput {
    /// An empty output.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            warnings: vec![],
        }
    }

    /// Insert (or replace) a named artifact.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Look up a named artifact.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Append a recoverable warning.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Record the fatal-error message and its diagnostic trace under the
    /// reserved keys. Set at most once per run.
    pub fn set_fatal(&mut self, msg: impl Into<String>, trace: impl Into<String>) {
        self.values.insert(ERROR_KEY.to_string(), msg.into().into());
        self.values
            .insert(ERROR_TRACE_KEY.to_string(), trace.into().into());
    }

    /// The fatal-error message, if the run failed after acquisition.
    #[must_use]
    pub fn fatal_error(&self) -> Option<&str> {
        self.values.get(ERROR_KEY).and_then(Value::as_str)
    }

    /// The fatal error's diagnostic trace, if set.
    #[must_use]
    pub fn error_trace(&self) -> Option<&str> {
        self.values.get(ERROR_TRACE_KEY).and_then(Value::as_str)
    }

    /// Whether the fatal-error key has been set.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.values.contains_key(ERROR_KEY)
    }
}
