#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Observable record of a wrapped action's lifecycle.
///
/// `time_start` and `execution_time` are clock readings in milliseconds.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExecutionState {
    /// Clock reading when the current execution began, `0.0` when idle.
    pub time_start: f64,
    pub is_executing: bool,
    /// Duration of the last completed execution, rounded to one decimal.
    pub execution_time: f64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub error: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub error_name: Option<String>,
    /// Set by callers; consumed at the next settlement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_cancelled: bool,
}

impl ExecutionState {
    pub fn is_idle(&self) -> bool {
        !self.is_executing
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when the last settlement was a cancellation.
    pub fn is_fail_with_canceled(&self) -> bool {
        self.error_name.as_deref() == Some(crate::ACTION_CANCELED)
    }

    pub(crate) fn begin(&mut self, now: f64) {
        self.execution_time = 0.0;
        self.is_executing = true;
        self.time_start = now;
        self.error = None;
        self.error_name = None;
    }

    pub(crate) fn finish(&mut self, now: f64) {
        self.is_executing = false;
        self.execution_time = round_to_tenth(now - self.time_start);
        self.time_start = 0.0;
    }

    pub(crate) fn record_error(&mut self, message: String, name: String) {
        self.error = Some(message);
        self.error_name = Some(name);
    }
}

/// Rounds a duration to one decimal place; never negative.
pub(crate) fn round_to_tenth(millis: f64) -> f64 {
    ((millis * 10.0).round() / 10.0).max(0.0)
}
